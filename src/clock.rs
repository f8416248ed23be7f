/// Monotonic millisecond time source used to bound completion polling
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin. Must never go backwards.
    fn now_ms(&mut self) -> u64;
}

impl<T: Clock + ?Sized> Clock for &mut T {
    fn now_ms(&mut self) -> u64 {
        T::now_ms(self)
    }
}
