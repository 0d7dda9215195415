use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct TerminalDimensions {
    pub width: u16,
    pub height: u16,
}

impl TerminalDimensions {
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub w: u16,
    pub h: u16,
}

impl Rect {
    pub const fn new(x: u16, y: u16, w: u16, h: u16) -> Self {
        Self { x, y, w, h }
    }

    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    pub fn right(&self) -> u16 {
        self.x.saturating_add(self.w)
    }

    pub fn bottom(&self) -> u16 {
        self.y.saturating_add(self.h)
    }

    pub fn split_left(self, w: u16) -> (Rect, Rect) {
        let left_w = w.min(self.w);
        let left = Rect::new(self.x, self.y, left_w, self.h);
        let rest = Rect::new(
            self.x.saturating_add(left_w),
            self.y,
            self.w.saturating_sub(left_w),
            self.h,
        );
        (left, rest)
    }

    pub fn split_top(self, h: u16) -> (Rect, Rect) {
        let top_h = h.min(self.h);
        let top = Rect::new(self.x, self.y, self.w, top_h);
        let rest = Rect::new(
            self.x,
            self.y.saturating_add(top_h),
            self.w,
            self.h.saturating_sub(top_h),
        );
        (top, rest)
    }

    /// Left part gets `num / den` of the width (rounded down), the rest goes right.
    pub fn split_columns(self, num: u16, den: u16) -> (Rect, Rect) {
        self.split_left(ratio(self.w, num, den))
    }

    /// Top part gets `num / den` of the height (rounded down), the rest goes below.
    pub fn split_rows(self, num: u16, den: u16) -> (Rect, Rect) {
        self.split_top(ratio(self.h, num, den))
    }

    /// Stacks `n` rows of equal height; the last row absorbs the remainder.
    pub fn stack(self, n: u16) -> Vec<Rect> {
        if n == 0 {
            return Vec::new();
        }
        let row_h = self.h / n;
        let mut rest = self;
        let mut rows = Vec::with_capacity(n as usize);
        for _ in 1..n {
            let (row, tail) = rest.split_top(row_h);
            rows.push(row);
            rest = tail;
        }
        rows.push(rest);
        rows
    }
}

fn ratio(total: u16, num: u16, den: u16) -> u16 {
    if den == 0 {
        return total;
    }
    ((total as u32 * num.min(den) as u32) / den as u32) as u16
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/layout/geom.rs"]
mod tests;
