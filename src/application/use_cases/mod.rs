/// Use cases module containing application business logic orchestration
mod generate_sbom;
mod write_outputs;

pub use generate_sbom::GenerateSbomUseCase;
pub use write_outputs::{WriteOutputsUseCase, USED_FILES_FILE_NAME};
