// Copyright (c) Handball Connect Team
// SPDX-License-Identifier: Apache-2.0

mod account;
mod board;
mod conversation;
mod post;

pub use account::{Account, NewAccount, ProfileUpdate};
pub use board::{Board, BoardSummary, Movement, Player};
pub use conversation::{Conversation, Message, NewMessage};
pub use post::{Comment, Like, NewComment, NewPost, Post};
