#![no_main]
use libfuzzer_sys::fuzz_target;

// every lookup must come back as a typed result, never an out-of-bounds read
fuzz_target!(|data: &[u8]| {
    for name in [".text", ".shstrtab", "", "\u{0}"] {
        let _ = scalpel::find_section(data, name);
    }
});
