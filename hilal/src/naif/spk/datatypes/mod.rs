/*
 * Hilal Toolkit
 * Copyright (C) 2024-onward the Hilal contributors (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

mod chebyshev;

pub use chebyshev::{Type2ChebyshevSet, Type3ChebyshevSet};
