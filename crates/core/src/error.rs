use thiserror::Error;

use crate::games::GameError;
use crate::model::ParseIdError;
use crate::phase::PhaseError;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Game(#[from] GameError),
    #[error(transparent)]
    Phase(#[from] PhaseError),
    #[error(transparent)]
    Parse(#[from] ParseIdError),
}
