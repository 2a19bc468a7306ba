mod builder;

pub use builder::build_arguments;
