#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct Width(pub usize);
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct Height(pub usize);

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct NodesCount(pub usize);
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct EdgesCount(pub usize);

/// Maximum number of passage crossings allowed in one move or reachability query.
#[derive(Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Debug, Hash)]
pub struct ReachDistance(pub usize);

#[derive(Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Debug, Hash)]
pub struct PlayerIndex(pub usize);
#[derive(Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Debug, Hash)]
pub struct DragonIndex(pub usize);
