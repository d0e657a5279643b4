table! {
    projects (id) {
        id -> Int4,
        name -> Text,
    }
}

table! {
    todos (id) {
        id -> Int4,
        projectid -> Int4,
        title -> Nullable<Text>,
        description -> Nullable<Text>,
        createddate -> Timestamptz,
        updateddate -> Timestamptz,
        duedate -> Nullable<Text>,
        complete -> Bool,
    }
}

allow_tables_to_appear_in_same_query!(projects, todos);
