// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use keyflux_group::KeyComparer;
use std::hash::Hasher;

/// ASCII case-insensitive comparer for string keys.
#[derive(Debug, Default, Clone, Copy)]
pub struct CaseInsensitive;

impl KeyComparer<String> for CaseInsensitive {
    fn equals(&self, a: &String, b: &String) -> bool {
        a.eq_ignore_ascii_case(b)
    }

    fn hash_key(&self, key: &String, state: &mut dyn Hasher) {
        for byte in key.bytes() {
            state.write_u8(byte.to_ascii_lowercase());
        }
        state.write_u8(0xff);
    }
}
