mod hyperbench;

pub use hyperbench::parse_hyperbench;
pub use hyperbench::read_hyperbench;
pub use hyperbench::write_hyperbench;
pub use hyperbench::ReadHyperBenchError;
pub use hyperbench::WriteHyperBenchError;
