use entwine::prelude::*;

#[derive(Clone, Debug, Default, Inject)]
struct Leaf;

impl Lifecycle for Leaf {}

#[derive(Clone, Debug, Inject)]
struct Holder<T>
where
    T: Component,
{
    #[inject(rename = "inner")]
    value: Option<Arc<T>>,
}

impl<T: Component + Clone> Lifecycle for Holder<T> {}

fn main() {
    let mut holder = Holder::<Leaf> { value: None };
    holder.inject("inner", Leaf.into_ref()).unwrap();
    assert!(holder.value.is_some());

    let mut wrong = Holder::<Leaf> { value: None };
    assert!(wrong.inject("inner", Holder::<Leaf> { value: None }.into_ref()).is_err());
}
