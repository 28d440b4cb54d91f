use thiserror::Error;

use crate::Key;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    #[error("no node with key {0}")]
    NotFound(Key),
    #[error("node {0} already has every child slot occupied")]
    Full(Key),
    #[error("node {0} is not a leaf")]
    HasChildren(Key),
    #[error("tree has no root")]
    EmptyTree,
    #[error("allocation failed")]
    AllocationFailure,
}
