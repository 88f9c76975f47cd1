// Copyright (c) Handball Connect Team
// SPDX-License-Identifier: Apache-2.0

mod common;

use handball_connect::board::{BoardEditor, Formation};
use handball_connect::error::Error;
use handball_connect::models::BoardSummary;

use common::{env, promote_to_admin, register};

fn summary_from_editor(editor: &BoardEditor, title: &str) -> BoardSummary {
    BoardSummary {
        id: editor.board_id().map(str::to_string),
        title: title.to_string(),
        description: String::new(),
        players: editor.players().to_vec(),
        movements: editor.movements().to_vec(),
        snapshot: None,
        is_shared: false,
    }
}

#[tokio::test]
async fn saving_an_editor_snapshot_creates_a_private_board() {
    let env = env();
    let anna = register(&env, "anna").await;

    let mut editor = BoardEditor::new();
    editor.add_movement(0.2, 0.5, 0.4, 0.5, Some(1), false);
    let board = env
        .stores
        .tactics
        .save_board(&anna, summary_from_editor(&editor, "wing attack"))
        .await
        .unwrap();

    assert_eq!(board.owner_id, anna.id);
    assert_eq!(board.players.len(), 12);
    assert_eq!(board.movements.len(), 1);
    assert!(!board.is_shared);

    assert_eq!(env.stores.tactics.my_boards(&anna.id).await.unwrap().len(), 1);
    assert!(env.stores.tactics.shared_boards().await.unwrap().is_empty());
}

#[tokio::test]
async fn untitled_boards_are_rejected() {
    let env = env();
    let anna = register(&env, "anna").await;

    let err = env
        .stores
        .tactics
        .save_board(&anna, summary_from_editor(&BoardEditor::new(), "  "))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn updating_a_board_keeps_id_and_creation_time() {
    let env = env();
    let anna = register(&env, "anna").await;

    let board = env
        .stores
        .tactics
        .save_board(&anna, summary_from_editor(&BoardEditor::new(), "v1"))
        .await
        .unwrap();

    let mut editor = BoardEditor::from_board(&board);
    editor.apply_template(Formation::FiveOne);
    let updated = env
        .stores
        .tactics
        .save_board(&anna, summary_from_editor(&editor, "v2"))
        .await
        .unwrap();

    assert_eq!(updated.id, board.id);
    assert_eq!(updated.created_at, board.created_at);
    assert_eq!(updated.title, "v2");
    assert_eq!(updated.players.len(), 13);
    assert_eq!(env.stores.tactics.my_boards(&anna.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn only_the_owner_can_edit_or_share() {
    let env = env();
    let anna = register(&env, "anna").await;
    let bert = register(&env, "bert").await;

    let board = env
        .stores
        .tactics
        .save_board(&anna, summary_from_editor(&BoardEditor::new(), "secret"))
        .await
        .unwrap();

    let mut stolen = summary_from_editor(&BoardEditor::from_board(&board), "stolen");
    stolen.id = Some(board.id.clone());
    let err = env.stores.tactics.save_board(&bert, stolen).await.unwrap_err();
    assert!(matches!(err, Error::NotAuthorized(_)));

    let err = env
        .stores
        .tactics
        .set_shared(&bert, &board.id, true)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotAuthorized(_)));

    // Even an admin cannot flip someone else's share switch.
    let moderator = promote_to_admin(&env, &bert).await;
    let err = env
        .stores
        .tactics
        .set_shared(&moderator, &board.id, true)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotAuthorized(_)));
}

#[tokio::test]
async fn sharing_opens_a_board_to_other_viewers() {
    let env = env();
    let anna = register(&env, "anna").await;
    let bert = register(&env, "bert").await;

    let board = env
        .stores
        .tactics
        .save_board(&anna, summary_from_editor(&BoardEditor::new(), "set play"))
        .await
        .unwrap();

    let err = env.stores.tactics.board_for(&bert, &board.id).await.unwrap_err();
    assert!(matches!(err, Error::NotAuthorized(_)));

    env.stores.tactics.set_shared(&anna, &board.id, true).await.unwrap();

    let visible = env.stores.tactics.board_for(&bert, &board.id).await.unwrap();
    assert_eq!(visible.id, board.id);
    assert_eq!(env.stores.tactics.shared_boards().await.unwrap().len(), 1);

    // Unsharing hides it again.
    env.stores.tactics.set_shared(&anna, &board.id, false).await.unwrap();
    assert!(env.stores.tactics.board_for(&bert, &board.id).await.is_err());
}

#[tokio::test]
async fn deletion_is_owner_or_admin_only() {
    let env = env();
    let anna = register(&env, "anna").await;
    let bert = register(&env, "bert").await;

    let board = env
        .stores
        .tactics
        .save_board(&anna, summary_from_editor(&BoardEditor::new(), "doomed"))
        .await
        .unwrap();

    let err = env.stores.tactics.delete_board(&bert, &board.id).await.unwrap_err();
    assert!(matches!(err, Error::NotAuthorized(_)));

    let moderator = promote_to_admin(&env, &bert).await;
    env.stores.tactics.delete_board(&moderator, &board.id).await.unwrap();
    assert!(env.stores.tactics.my_boards(&anna.id).await.unwrap().is_empty());
}
