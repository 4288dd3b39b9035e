use component_macros::Component;
use di_abstractions::{Autowired, BeanDefinition};

#[derive(Default, Component)]
struct Clock;

#[derive(Default, Component)]
struct Holder<T: Send + Sync + 'static> {
    #[inject]
    value: Autowired<T>,
}

fn main() {
    let definition = BeanDefinition::of::<Holder<Clock>>().unwrap();
    assert_eq!(definition.fields()[0].name(), "value");
}
