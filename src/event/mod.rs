mod bus;
mod events;

pub use bus::EventBus;
pub use events::PadEvent;

pub trait EventHandler {
    fn handle_event(&mut self, event: &PadEvent);
}

impl<F> EventHandler for F
where
    F: FnMut(&PadEvent),
{
    fn handle_event(&mut self, event: &PadEvent) {
        self(event)
    }
}
