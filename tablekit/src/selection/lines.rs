use tabledom::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinePosition {
    Left,
    Right,
    Top,
    Bottom,
}

impl LinePosition {
    pub const ALL: [LinePosition; 4] = [
        LinePosition::Left,
        LinePosition::Right,
        LinePosition::Top,
        LinePosition::Bottom,
    ];
}

/// The four one-pixel lines drawn around a selection boundary.
///
/// Positions are in the same frame as the boundary, shifted left by the
/// table view's horizontal scroll.
#[derive(Debug, Clone, PartialEq)]
pub struct HelpLines {
    color: String,
    visible: bool,
    left: Rect,
    right: Rect,
    top: Rect,
    bottom: Rect,
}

impl HelpLines {
    pub fn new(color: impl Into<String>) -> Self {
        Self {
            color: color.into(),
            visible: false,
            left: Rect::default(),
            right: Rect::default(),
            top: Rect::default(),
            bottom: Rect::default(),
        }
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn get(&self, position: LinePosition) -> Rect {
        match position {
            LinePosition::Left => self.left,
            LinePosition::Right => self.right,
            LinePosition::Top => self.top,
            LinePosition::Bottom => self.bottom,
        }
    }

    /// Visible lines with their rectangles.
    pub fn iter(&self) -> impl Iterator<Item = (LinePosition, Rect)> + '_ {
        LinePosition::ALL
            .into_iter()
            .filter(|_| self.visible)
            .map(|position| (position, self.get(position)))
    }

    pub(crate) fn place(&mut self, boundary: Rect, scroll_left: f32) {
        let x = boundary.x - scroll_left;
        self.left = Rect::new(x - 1.0, boundary.y, 1.0, boundary.height + 1.0);
        self.right = Rect::new(boundary.x1() - scroll_left, boundary.y, 1.0, boundary.height + 1.0);
        self.top = Rect::new(x - 1.0, boundary.y, boundary.width + 1.0, 1.0);
        self.bottom = Rect::new(x - 1.0, boundary.y1() + 1.0, boundary.width + 1.0, 1.0);
        self.visible = true;
    }

    pub(crate) fn hide(&mut self) {
        self.visible = false;
    }
}
