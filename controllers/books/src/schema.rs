table! {
    books (id) {
        id -> Varchar,
        title -> Varchar,
        author -> Varchar,
        description -> Text,
        cover_url -> Nullable<Varchar>,
        title_lowercase -> Varchar,
    }
}

table! {
    user_books (user_id, book_id) {
        user_id -> Varchar,
        book_id -> Varchar,
        score -> Nullable<Int2>,
        comment -> Nullable<Text>,
        updated_at -> Timestamptz,
    }
}

joinable!(user_books -> books (book_id));

allow_tables_to_appear_in_same_query!(
    books,
    user_books,
);
