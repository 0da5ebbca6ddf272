/*
 * Hilal Toolkit
 * Copyright (C) 2024-onward the Hilal contributors (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

pub mod daf;
pub mod spk;

/// Byte order of a DAF file. Detected once at parse time; every subsequent
/// numeric read honors it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Endian {
    Little,
    Big,
}

#[macro_export]
macro_rules! parse_bytes_as {
    ($type:ident, $input:expr, $order:expr) => {{
        let (num_bytes, _) = $input.split_at(core::mem::size_of::<$type>());

        match $order {
            $crate::naif::Endian::Little => $type::from_le_bytes(num_bytes.try_into().unwrap()),
            $crate::naif::Endian::Big => $type::from_be_bytes(num_bytes.try_into().unwrap()),
        }
    }};
}
