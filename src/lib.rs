// Copyright (c)  by Gleb E. Zaslavkiy
//MIT License
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
/// configuration parsing, logging setup and result files
pub mod Utils;
/// grid builder, finite differences, bracketing minimizers
pub mod numerical;
/// formula parser, symbolic derivatives, simplification, conversion to closures
pub mod symbolic;
/// config-driven minimization and differentiation runs
pub mod tasks;
