mod generate;

pub use generate::GenerateArgs;
