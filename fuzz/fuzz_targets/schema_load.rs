#![no_main]

// Harness: schema_load
// Focus: arbitrary bytes never panic the schema parser or store builder.

use libfuzzer_sys::fuzz_target;
use authority_core::AccessControlSchema;

fuzz_target!(|data: &[u8]| {
    if let Ok(schema) = AccessControlSchema::from_json_reader(data) {
        let _ = schema.build_store();
    }
});
