use entwine::prelude::*;

#[derive(Clone, Debug, Default, Inject)]
struct Database {
    url: String,
}

impl Lifecycle for Database {}

#[derive(Clone, Debug, Default, Inject)]
struct Cache;

impl Lifecycle for Cache {}

#[derive(Clone, Debug, Default, Inject)]
struct Api {
    #[inject]
    database: Option<Arc<Database>>,
    #[inject(rename = "cc")]
    cache: Option<Arc<Cache>>,
    port: u16,
}

impl Lifecycle for Api {}

#[derive(Clone, Debug, Default, Inject)]
struct Pair(#[inject(rename = "db")] Option<Arc<Database>>, u8);

impl Lifecycle for Pair {}

fn main() {
    let mut api = Api::default();
    api.inject("database", Database::default().into_ref()).unwrap();
    api.inject("cc", Cache.into_ref()).unwrap();
    assert!(api.database.is_some() && api.cache.is_some());
    assert!(api.inject("cache", Cache.into_ref()).is_err());
    assert!(api.inject("port", Cache.into_ref()).is_err());
    assert_eq!(api.port, 0);

    let mut pair = Pair::default();
    pair.inject("db", Database::default().into_ref()).unwrap();
    pair.eject("db");
    assert!(pair.0.is_none());
    assert_eq!(pair.1, 0);
}
