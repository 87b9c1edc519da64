//! different utility modules used throughout the project
/// typed run configuration with defaults
pub mod config;
/// terminal and file logger setup
pub mod logger;
/// writes task results as space separated .dat files
pub mod result_writer;
/// parse document with structure like " title1 key1: value1 key2: value2 [title2] key3 = value3" into HashMap
pub mod task_parser;
