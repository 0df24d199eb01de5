/// Hands out object numbers for one document build.
///
/// Numbers start at 1 (0 belongs to the free-list sentinel), grow by one per
/// call and are never reused.
#[derive(Debug, Clone)]
pub struct ObjectNumberGenerator {
    next: u32,
}

impl ObjectNumberGenerator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn next_number(&mut self) -> u32 {
        let number = self.next;
        self.next += 1;
        number
    }

    /// Number the next call to [`Self::next_number`] will return.
    pub fn peek(&self) -> u32 {
        self.next
    }

    /// How many numbers have been handed out so far.
    pub fn issued(&self) -> u32 {
        self.next - 1
    }
}

impl Default for ObjectNumberGenerator {
    fn default() -> Self {
        Self::new()
    }
}
