mod args;
mod credit;
mod debt;
mod system;

use super::registry::CommandRegistry;

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    credit::register(registry);
    debt::register(registry);
    system::register(registry);
}
