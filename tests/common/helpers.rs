//! Widget construction and scheduling helpers.

use std::sync::Arc;
use std::time::Duration;

use magic_address::{AddressBook, AddressInput, InputConfig};
use magic_resolver::ScriptedResolver;

/// A widget with default config, a fresh book and a scripted resolver.
pub fn scripted_input() -> (AddressInput<ScriptedResolver>, Arc<ScriptedResolver>) {
    scripted_input_with_book(AddressBook::shared())
}

pub fn scripted_input_with_book(
    book: Arc<AddressBook>,
) -> (AddressInput<ScriptedResolver>, Arc<ScriptedResolver>) {
    let resolver = Arc::new(ScriptedResolver::new());
    let input = AddressInput::new(&InputConfig::default(), book, Arc::clone(&resolver));
    (input, resolver)
}

/// Let spawned lookups reach the resolver and park.
///
/// Under a paused clock the sleep only returns once every runnable task has
/// been polled.
pub async fn let_lookups_park() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}
