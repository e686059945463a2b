mod arena;
mod entry;
mod handle;
mod raw_red_black_tree;
mod raw_two_three_tree;
mod rb_node;
mod two_three_node;

pub(crate) use raw_red_black_tree::RawRedBlackTree;
pub(crate) use raw_two_three_tree::RawTwoThreeTree;
