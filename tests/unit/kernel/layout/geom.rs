use super::*;

#[test]
fn split_left_clamps_to_width() {
    let r = Rect::new(0, 0, 10, 5);
    let (left, rest) = r.split_left(4);
    assert_eq!(left, Rect::new(0, 0, 4, 5));
    assert_eq!(rest, Rect::new(4, 0, 6, 5));

    let (left, rest) = r.split_left(40);
    assert_eq!(left, r);
    assert!(rest.is_empty());
}

#[test]
fn split_rows_uses_floor_ratio() {
    let r = Rect::new(2, 3, 10, 7);
    let (top, bottom) = r.split_rows(1, 2);
    assert_eq!(top, Rect::new(2, 3, 10, 3));
    assert_eq!(bottom, Rect::new(2, 6, 10, 4));
    assert_eq!(bottom.bottom(), r.bottom());
}

#[test]
fn zero_denominator_keeps_everything_left() {
    let r = Rect::new(0, 0, 8, 8);
    let (left, rest) = r.split_columns(1, 0);
    assert_eq!(left, r);
    assert!(rest.is_empty());
}

#[test]
fn stack_gives_remainder_to_last_row() {
    let rows = Rect::new(0, 0, 4, 10).stack(3);
    assert_eq!(
        rows,
        vec![
            Rect::new(0, 0, 4, 3),
            Rect::new(0, 3, 4, 3),
            Rect::new(0, 6, 4, 4),
        ]
    );
    assert!(Rect::new(0, 0, 4, 10).stack(0).is_empty());
}

#[test]
fn dimensions_area_starts_at_origin() {
    assert_eq!(
        TerminalDimensions::new(80, 24).area(),
        Rect::new(0, 0, 80, 24)
    );
}
