/// Ports module defining interfaces for hexagonal architecture
///
/// This module contains the outbound ports (driven ports - infrastructure
/// interfaces). The use case itself is the only driving entry point.
pub mod outbound;
