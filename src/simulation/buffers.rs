use crate::simulation::Field;

/// Ping-pong pair of fields. Neither buffer is reallocated after construction.
pub struct FieldBuffers {
    /// Buffer A - ping
    buffer_a: Field,
    /// Buffer B - pong
    buffer_b: Field,
    /// Which buffer is current (true = A is current, false = B is current)
    read_from_a: bool,
}

impl FieldBuffers {
    /// Create the pair with `initial` as the current generation
    pub fn new(initial: Field) -> Self {
        let scratch = Field::new(initial.width(), initial.height());
        Self {
            buffer_a: initial,
            buffer_b: scratch,
            read_from_a: true,
        }
    }

    /// The completed generation
    pub fn current(&self) -> &Field {
        if self.read_from_a {
            &self.buffer_a
        } else {
            &self.buffer_b
        }
    }

    /// Get (current, next) for one tick; `next` is fully overwritten by the caller
    pub fn io_buffers(&mut self) -> (&Field, &mut Field) {
        if self.read_from_a {
            (&self.buffer_a, &mut self.buffer_b)
        } else {
            (&self.buffer_b, &mut self.buffer_a)
        }
    }

    /// Replace the current generation in place
    pub fn load(&mut self, field: &Field) {
        let current = if self.read_from_a {
            &mut self.buffer_a
        } else {
            &mut self.buffer_b
        };
        current.cells_mut().copy_from_slice(field.cells());
    }

    /// Swap roles after the next buffer has been written
    pub fn swap(&mut self) {
        self.read_from_a = !self.read_from_a;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swap_exposes_written_buffer() {
        let mut initial = Field::new(2, 2);
        initial.fill(0.25);
        let mut buffers = FieldBuffers::new(initial);

        {
            let (current, next) = buffers.io_buffers();
            assert_eq!(current.get(0, 0), 0.25);
            next.fill(0.5);
        }
        assert_eq!(buffers.current().get(1, 1), 0.25);

        buffers.swap();
        assert_eq!(buffers.current().get(1, 1), 0.5);

        buffers.swap();
        assert_eq!(buffers.current().get(1, 1), 0.25);
    }

    #[test]
    fn test_load_overwrites_current_only() {
        let mut buffers = FieldBuffers::new(Field::new(2, 1));
        let mut replacement = Field::new(2, 1);
        replacement.fill(1.0);
        buffers.load(&replacement);
        assert_eq!(buffers.current().total_mass(), 2.0);
        let (_, next) = buffers.io_buffers();
        assert_eq!(next.total_mass(), 0.0);
    }
}
