/// Row-major grid of scalars in [0, 1] with toroidal indexing
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    cells: Vec<f64>,
    width: usize,
    height: usize,
}

impl Field {
    /// Create an all-zero field
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            cells: vec![0.0; width * height],
            width,
            height,
        }
    }

    /// Wrap existing row-major data; `None` if the length does not match
    pub fn from_vec(width: usize, height: usize, cells: Vec<f64>) -> Option<Self> {
        if cells.len() != width * height {
            return None;
        }
        Some(Self {
            cells,
            width,
            height,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.cells[y * self.width + x]
    }

    /// Read with wrap-around on both axes
    #[inline]
    pub fn get_wrapped(&self, x: isize, y: isize) -> f64 {
        let wx = x.rem_euclid(self.width as isize) as usize;
        let wy = y.rem_euclid(self.height as isize) as usize;
        self.cells[wy * self.width + wx]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: f64) {
        self.cells[y * self.width + x] = value;
    }

    pub fn cells(&self) -> &[f64] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [f64] {
        &mut self.cells
    }

    pub fn fill(&mut self, value: f64) {
        self.cells.fill(value);
    }

    /// Sum of all cell values
    pub fn total_mass(&self) -> f64 {
        self.cells.iter().sum()
    }

    /// Copy of this field translated by (dx, dy) with wrap-around.
    ///
    /// The value at (x, y) moves to (x + dx, y + dy).
    pub fn shifted(&self, dx: isize, dy: isize) -> Self {
        let mut out = Self::new(self.width, self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                out.set(x, y, self.get_wrapped(x as isize - dx, y as isize - dy));
            }
        }
        out
    }

    pub fn view(&self) -> FieldView<'_> {
        FieldView { field: self }
    }
}

/// Read-only view of a completed generation, handed to renderers
#[derive(Clone, Copy, Debug)]
pub struct FieldView<'a> {
    field: &'a Field,
}

impl<'a> FieldView<'a> {
    pub fn width(&self) -> usize {
        self.field.width
    }

    pub fn height(&self) -> usize {
        self.field.height
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.field.get(x, y)
    }

    pub fn cells(&self) -> &'a [f64] {
        &self.field.cells
    }

    pub fn row(&self, y: usize) -> &'a [f64] {
        let start = y * self.field.width;
        &self.field.cells[start..start + self.field.width]
    }

    /// Native-endian bytes of the cell data, ready for a texture upload
    pub fn as_bytes(&self) -> &'a [u8] {
        bytemuck::cast_slice(&self.field.cells)
    }

    pub fn to_field(&self) -> Field {
        self.field.clone()
    }
}
