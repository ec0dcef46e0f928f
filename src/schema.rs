diesel::table! {
    posts (id) {
        id -> Int4,
        title -> Text,
        body -> Text,
        created_at -> Timestamp,
    }
}
