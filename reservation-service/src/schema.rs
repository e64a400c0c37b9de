diesel::table! {
    reservations (id) {
        id -> Uuid,
        date -> Date,
        trip_number -> Int4,
        people_count -> Int4,
        name -> Varchar,
        phone -> Varchar,
        email -> Nullable<Varchar>,
        rod_rental -> Bool,
        rod_rental_count -> Int4,
        note -> Nullable<Text>,
        status -> Varchar,
        source -> Varchar,
        created_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    customers (id) {
        id -> Uuid,
        name -> Varchar,
        name_kana -> Nullable<Varchar>,
        phone -> Varchar,
        email -> Nullable<Varchar>,
        created_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    schedule_overrides (date, trip_number) {
        date -> Date,
        trip_number -> Int4,
        is_available -> Bool,
        max_capacity -> Int4,
        updated_at -> Nullable<Timestamptz>,
    }
}

diesel::allow_tables_to_appear_in_same_query!(
    reservations,
    customers,
    schedule_overrides,
);
