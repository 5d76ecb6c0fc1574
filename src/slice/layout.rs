/// Square grid of subplot cells large enough to hold every panel.
///
/// Panels fill the grid row by row; trailing cells stay empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub rows: usize,
    pub cols: usize,
    panels: usize,
}

impl GridLayout {
    /// `ceil(sqrt(n))` rows and columns for `n` panels
    pub fn for_panels(panels: usize) -> Self {
        let mut side = 0;
        while side * side < panels {
            side += 1;
        }

        Self {
            rows: side,
            cols: side,
            panels,
        }
    }

    /// `(row, col)` of the panel at `index`
    pub fn position(&self, index: usize) -> (usize, usize) {
        if self.cols == 0 {
            return (0, 0);
        }
        (index / self.cols, index % self.cols)
    }

    pub fn cells(&self) -> usize {
        self.rows * self.cols
    }

    /// cells left blank after every panel has been placed
    pub fn unused_cells(&self) -> usize {
        self.cells().saturating_sub(self.panels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_layouts() {
        let four = GridLayout::for_panels(4);
        assert_eq!((four.rows, four.cols), (2, 2));
        assert_eq!(four.unused_cells(), 0);

        let five = GridLayout::for_panels(5);
        assert_eq!((five.rows, five.cols), (3, 3));
        assert_eq!(five.unused_cells(), 4);

        let one = GridLayout::for_panels(1);
        assert_eq!((one.rows, one.cols), (1, 1));
    }

    #[test]
    fn panel_positions() {
        let layout = GridLayout::for_panels(5);

        assert_eq!(layout.position(0), (0, 0));
        assert_eq!(layout.position(2), (0, 2));
        assert_eq!(layout.position(3), (1, 0));
        assert_eq!(layout.position(4), (1, 1));
    }
}
