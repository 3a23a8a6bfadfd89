/// Axis-aligned rectangle in some reference frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_edges(x: f32, y: f32, x1: f32, y1: f32) -> Self {
        Self::new(x, y, x1 - x, y1 - y)
    }

    /// Right edge.
    pub fn x1(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    pub fn y1(&self) -> f32 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.x1() && y >= self.y && y < self.y1()
    }

    /// Translate into the frame whose origin is `frame`'s top-left corner.
    pub fn relative_to(self, frame: Rect) -> Self {
        Self::new(self.x - frame.x, self.y - frame.y, self.width, self.height)
    }

    /// Smallest box covering both rectangles, measured the way a selection
    /// boundary is: each rectangle contributes its start edge and its last
    /// pixel (`start + size - 1`).
    pub fn envelope(self, other: Rect) -> Self {
        let xs = [
            self.x,
            other.x,
            self.x + self.width - 1.0,
            other.x + other.width - 1.0,
        ];
        let ys = [
            self.y,
            other.y,
            self.y + self.height - 1.0,
            other.y + other.height - 1.0,
        ];
        let (x, x1) = min_max(&xs);
        let (y, y1) = min_max(&ys);
        Self::from_edges(x, y, x1, y1)
    }
}

fn min_max(values: &[f32]) -> (f32, f32) {
    values
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}
