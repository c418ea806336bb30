fn main() {
    println!("Run `cargo test -p wire-compat` to execute wire compatibility tests.");
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use playkit_bridge::mock::{MockOpener, OpenBehavior};
    use playkit_core::{AccessToken, Session, Settings};
    use playkit_graph::decode::decode_data;
    use playkit_graph::mock::MockConnection;
    use playkit_graph::{GateKeeperManager, ParamValue};
    use playkit_tournaments::Tournament;

    /// Returns the path to the fixtures directory.
    fn fixtures_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
    }

    /// Loads a fixture JSON file and returns it as a `serde_json::Value`.
    fn load_fixture(name: &str) -> serde_json::Value {
        let path = fixtures_dir().join(name);
        let data = fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()));
        serde_json::from_str(&data)
            .unwrap_or_else(|e| panic!("failed to parse fixture {}: {e}", path.display()))
    }

    /// Normalizes JSON values so that integer-valued floats compare equal.
    ///
    /// The server sends `65` where serde writes an `f64` as `65.0`.
    fn normalize_value(v: &serde_json::Value) -> serde_json::Value {
        match v {
            serde_json::Value::Number(n) => {
                if let Some(f) = n.as_f64() {
                    serde_json::json!(f)
                } else {
                    v.clone()
                }
            }
            serde_json::Value::Object(map) => {
                let normalized: serde_json::Map<String, serde_json::Value> = map
                    .iter()
                    .map(|(k, v)| (k.clone(), normalize_value(v)))
                    .collect();
                serde_json::Value::Object(normalized)
            }
            serde_json::Value::Array(arr) => {
                serde_json::Value::Array(arr.iter().map(normalize_value).collect())
            }
            _ => v.clone(),
        }
    }

    /// Deserializes a fixture into a Rust type, re-serializes it, and compares
    /// the JSON values (order-independent, float-normalized comparison).
    fn roundtrip_test<T>(name: &str)
    where
        T: serde::de::DeserializeOwned + serde::Serialize,
    {
        let fixture = load_fixture(name);
        let parsed: T = serde_json::from_value(fixture.clone())
            .unwrap_or_else(|e| panic!("failed to deserialize {name}: {e}"));
        let reserialized = serde_json::to_value(&parsed)
            .unwrap_or_else(|e| panic!("failed to re-serialize {name}: {e}"));

        assert_eq!(
            normalize_value(&fixture),
            normalize_value(&reserialized),
            "roundtrip mismatch for {name}:\n  wire: {fixture}\n  Rust: {reserialized}"
        );
    }

    fn session() -> Session {
        let mut session = Session::in_memory(Settings::with_app_id("123456789"));
        session
            .set_access_token(Some(AccessToken::new("EAAB", "123456789", "1000")))
            .unwrap();
        session
    }

    // --- Stored state ---

    #[test]
    fn fixture_settings() {
        roundtrip_test::<Settings>("settings.json");
    }

    #[test]
    fn fixture_access_token() {
        roundtrip_test::<AccessToken>("access_token.json");
        let token: AccessToken = serde_json::from_value(load_fixture("access_token.json")).unwrap();
        assert!(token.is_gaming_domain());
        assert!(token.has_granted("gaming_profile"));
    }

    // --- Graph responses ---

    #[test]
    fn fixture_tournament() {
        roundtrip_test::<Tournament>("tournament.json");
    }

    #[test]
    fn fixture_tournaments_response() {
        let tournaments: Vec<Tournament> =
            decode_data(load_fixture("tournaments_response.json")).unwrap();
        assert_eq!(tournaments.len(), 2);
        assert_eq!(tournaments[0].title.as_deref(), Some("Weekly speedrun"));
        assert!(tournaments[1].title.is_none());
        assert_eq!(tournaments[1].end_time.unwrap().timestamp(), 1_640_995_200);
    }

    #[tokio::test]
    async fn fixture_gatekeepers_response() {
        let conn = MockConnection::new();
        conn.push_ok(load_fixture("gatekeepers_response.json"));
        let manager = GateKeeperManager::new();
        manager.load(&conn, &session()).await.unwrap();

        assert!(!manager.bool_for_key("app_events_killswitch", true));
        assert!(manager.bool_for_key("gaming_custom_update", false));
        assert!(manager.bool_for_key("video_chunked_upload", false));
        assert_eq!(manager.values().len(), 3);
    }

    #[tokio::test]
    async fn fixture_video_upload_phases() {
        let phases = load_fixture("video_upload_phases.json");
        let conn = MockConnection::new();
        conn.push_ok(phases["start"].clone());
        for window in phases["transfer"].as_array().unwrap() {
            conn.push_ok(window.clone());
        }
        conn.push_ok(phases["finish"].clone());

        let result = playkit_upload::VideoUploader::new(&conn, "run.mp4", 12)
            .upload(&session(), &b"abcdefghijkl".to_vec())
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(result.video_id, 7700);

        let requests = conn.requests();
        assert_eq!(requests.len(), 4);
        assert!(
            requests[1..]
                .iter()
                .all(|r| r.get_param("upload_session_id") == Some(&ParamValue::Int(8900)))
        );
    }

    // --- Request payloads ---

    #[test]
    fn fixture_custom_update_text() {
        let text = playkit_dialogs::LocalizedText::new("Beat my score!")
            .localized("es_LA", "¡Supera mi puntaje!")
            .localized("pt_BR", "Supere minha pontuação!");
        assert_eq!(
            serde_json::to_value(&text).unwrap(),
            load_fixture("custom_update_text.json")
        );
    }

    #[test]
    fn app_event_wire_keys() {
        let event = playkit_events::AppEvent::new("level_achieved")
            .value_to_sum(3.0)
            .param("level", "7");
        let json = normalize_value(&event.to_json());
        assert_eq!(json["_eventName"], "level_achieved");
        assert_eq!(json["_valueToSum"], normalize_value(&serde_json::json!(3)));
        assert_eq!(json["level"], "7");
        assert!(json["_logTime"].is_number());
    }

    // --- URLs ---

    #[test]
    fn deep_link_shapes() {
        let share = playkit_bridge::deep_link(
            &["me", "instant_tournament", "123456789"],
            [("tournament_id", "42"), ("score", "1000")],
        )
        .unwrap();
        assert_eq!(
            share.as_str(),
            "https://fb.gg/me/instant_tournament/123456789?tournament_id=42&score=1000"
        );

        let friend_finder =
            playkit_bridge::deep_link(&["friendfinder", "123456789"], Vec::<(&str, &str)>::new())
                .unwrap();
        assert_eq!(friend_finder.as_str(), "https://fb.gg/friendfinder/123456789");
    }

    #[tokio::test]
    async fn context_choose_callback() {
        let mut session = session();
        let opener = MockOpener::new(OpenBehavior::Opened);
        let mut dialog = playkit_dialogs::ChooseContextDialog::new(
            playkit_dialogs::ChooseContextContent::default(),
        );
        dialog.show(&session, &opener).await.unwrap();
        let url = playkit_bridge::Url::parse(
            "fb123456789://gaming/contextchoose/?context_id=123&context_size=3",
        )
        .unwrap();

        use playkit_bridge::UrlOpening;
        let outcome = dialog.open_url(&url, &mut session).unwrap().unwrap();
        assert!(matches!(
            outcome,
            playkit_dialogs::ContextDialogOutcome::Completed(ref ctx) if ctx.identifier == "123" && ctx.size == 3
        ));
        assert_eq!(session.gaming_context().unwrap().identifier, "123");
    }
}
