#![no_main]

use byrdocs::{Catalog, KeywordResolver, Resolver, Category};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(catalog) = Catalog::from_json("fuzz", data) else {
        return;
    };

    // Every exam paper gets a title; searching never panics
    for doc in catalog.iter() {
        let _ = doc.filename();
        if doc.category() == Category::Test {
            assert!(!doc.title().is_empty());
        }
    }
    let _ = KeywordResolver.search(&catalog, "2020 第一学期", Category::All);
});
