#![no_main]

use byrdocs::UrlQuery;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(raw) = std::str::from_utf8(data) else {
        return;
    };

    // Lossy parsing must accept anything the address bar can hold
    let (query, _errors) = UrlQuery::parse_lossy(raw);

    // Whatever was recovered must survive a write and re-read unchanged
    let written = query.to_query_string();
    let reparsed = UrlQuery::parse(&written).expect("written query must parse");
    assert_eq!(reparsed, query);
});
