// stubrouter: generated registry
use crate::dispatcher::Dispatcher;

/// Bind every controller of the sample to its handler name.
pub fn register_all(dispatcher: &mut Dispatcher) {
    dispatcher.register_typed(
        "fake_outer_string",
        crate::pet_store::controllers::fake_outer_string::FakeOuterStringController,
    );
}
