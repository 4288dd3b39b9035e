use component_macros::Component;
use di_abstractions::{Autowired, BeanDefinition};
use infrastructure_common::{BoxError, Closable};
use std::sync::Arc;

trait Storage: Send + Sync {}

#[derive(Default, Component)]
struct Logger;

#[derive(Default, Component)]
#[component(provides(dyn Storage), closable)]
struct OkStorage {
    #[inject]
    logger: Autowired<Logger>,
}

impl Storage for OkStorage {}

impl Closable for OkStorage {
    fn close(&self) -> Result<(), BoxError> {
        Ok(())
    }
}

fn main() {
    let definition = BeanDefinition::of::<OkStorage>().unwrap();
    assert_eq!(definition.fields().len(), 1);
    assert!(definition.is_closable());

    let storage: Arc<dyn Storage> = Arc::new(OkStorage::default());
    let _ = storage;
}
