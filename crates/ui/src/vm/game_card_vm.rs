use mindcheck_core::model::GameKind;

/// One entry of the standalone games catalogue.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameCardVm {
    pub kind: GameKind,
    /// Argument accepted by `play`, e.g. "image-recall".
    pub slug: String,
    pub title: &'static str,
    pub description: &'static str,
}

impl From<GameKind> for GameCardVm {
    fn from(kind: GameKind) -> Self {
        Self {
            kind,
            slug: kind.as_str().replace('_', "-"),
            title: kind.title(),
            description: kind.description(),
        }
    }
}

#[must_use]
pub fn game_catalogue() -> Vec<GameCardVm> {
    GameKind::ALL.into_iter().map(GameCardVm::from).collect()
}
