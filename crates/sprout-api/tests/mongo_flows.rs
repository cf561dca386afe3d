//! Store-backed flows. These need a running MongoDB; opt in with
//! `MONGODB_URI=... cargo test -- --ignored` against a disposable database.

use sprout_persist::PersistClient;

async fn persist() -> PersistClient {
    let uri = std::env::var("MONGODB_URI").expect("MONGODB_URI must be set for ignored tests");
    PersistClient::connect(&uri, "sprout_test")
        .await
        .expect("failed to connect to MongoDB")
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn login_reuses_identity_for_the_same_provider_account() {
    let persist = persist().await;
    let openid = format!("openid-{}", uuid::Uuid::new_v4());

    let first = persist
        .users()
        .upsert_by_openid(&openid, &serde_json::json!({}))
        .await
        .unwrap();
    let second = persist
        .users()
        .upsert_by_openid(&openid, &serde_json::json!({"nickname": "later"}))
        .await
        .unwrap();

    assert_eq!(first.id, second.id, "same provider account, same user");
    // The store keeps millisecond precision
    assert!(second.last_login.timestamp_millis() >= first.last_login.timestamp_millis());
    assert_eq!(
        second.created_at.timestamp_millis(),
        first.created_at.timestamp_millis()
    );
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn foreign_and_missing_threads_look_the_same() {
    let persist = persist().await;
    let thread_id = format!("thread_{}", uuid::Uuid::new_v4());

    persist
        .threads()
        .create(thread_id.clone(), "user-a".to_string())
        .await
        .unwrap();

    assert!(persist
        .threads()
        .find_owned(&thread_id, "user-a")
        .await
        .unwrap()
        .is_some());

    // Wrong owner and nonexistent id both come back empty
    assert!(persist
        .threads()
        .find_owned(&thread_id, "user-b")
        .await
        .unwrap()
        .is_none());
    assert!(persist
        .threads()
        .find_owned("thread_missing", "user-a")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
#[ignore = "requires a running MongoDB"]
async fn ledger_reads_back_in_creation_order() {
    let persist = persist().await;
    let thread_id = format!("thread_{}", uuid::Uuid::new_v4());

    let profile = sprout_persist::ProfileContext {
        child_age: "4".to_string(),
        child_personality: "curious".to_string(),
        kindergarten: "yes".to_string(),
        interests: "dinosaurs".to_string(),
        languages: "english".to_string(),
        family_members: 3,
        has_siblings: "no".to_string(),
        siblings_age: None,
    };

    for question in ["first", "second"] {
        let record = sprout_persist::MessageRecord::new(
            thread_id.clone(),
            "user-a".to_string(),
            question.to_string(),
            profile.clone(),
            "general".to_string(),
            None,
        );
        persist.messages().append(&record).await.unwrap();
        // Keep creation timestamps distinct at millisecond precision
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let messages = persist.messages().for_thread(&thread_id).await.unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].text, "first");
    assert_eq!(messages[1].text, "second");
}
