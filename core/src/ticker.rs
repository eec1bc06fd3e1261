/// External once-per-second clock that drives [`Session::tick`](crate::Session::tick).
///
/// The session only signals when ticks are wanted; delivering them is up to
/// the host, e.g. an interval timer in the presentation layer.
pub trait TickSource {
    fn start_ticking(&mut self);
    fn stop_ticking(&mut self);
}

/// For hosts that poll [`Session::is_ticking`](crate::Session::is_ticking) instead.
impl TickSource for () {
    fn start_ticking(&mut self) {}
    fn stop_ticking(&mut self) {}
}

impl<T: TickSource + ?Sized> TickSource for &mut T {
    fn start_ticking(&mut self) {
        (**self).start_ticking()
    }

    fn stop_ticking(&mut self) {
        (**self).stop_ticking()
    }
}
