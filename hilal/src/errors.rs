/*
 * Hilal Toolkit
 * Copyright (C) 2024-onward the Hilal contributors (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use snafu::prelude::*;
use std::io::ErrorKind as IOErrorKind;

use crate::naif::spk::EphemerisError;

#[derive(Debug, PartialEq, Snafu)]
#[snafu(visibility(pub))]
pub enum AlmanacError {
    #[snafu(display("{action} encountered an error with ephemeris computation: {source}"))]
    Ephemeris {
        action: &'static str,
        source: EphemerisError,
    },
    #[snafu(display("{action} encountered a math error: {source}"))]
    Math {
        action: &'static str,
        source: MathError,
    },
    #[snafu(display("{source} encountered when loading {path}"))]
    Loading {
        path: String,
        source: InputOutputError,
    },
    #[snafu(display("{err}"))]
    GenericError { err: String },
}

pub type AlmanacResult<T> = Result<T, AlmanacError>;

#[derive(Debug, PartialEq, Snafu)]
#[snafu(visibility(pub))]
pub enum InputOutputError {
    /// Raised for an error in reading or writing the file(s)
    IOError { kind: IOErrorKind },
    /// Raised if an IO error occurred but its representation is not simple (and therefore not an std::io::ErrorKind).
    IOUnknownError,
}

#[derive(Copy, Clone, PartialEq, Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum MathError {
    #[snafu(display("cannot take the unit vector of a zero vector when {action}"))]
    ZeroVector { action: &'static str },
    #[snafu(display("prevented a division by zero when {action}"))]
    DivisionByZero { action: &'static str },
    #[snafu(display("{msg}: {value}"))]
    DomainError { value: f64, msg: &'static str },
    #[snafu(display("max iterations reached ({iter}) when {action}"))]
    MaxIterationsReached { iter: usize, action: &'static str },
}
