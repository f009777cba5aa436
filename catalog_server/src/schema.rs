//! Diesel table definitions for the catalog.
//!
//! Tables: products, users, contact_queries.

diesel::table! {
    products (id) {
        id -> Uuid,
        name -> Varchar,
        title -> Varchar,
        slug -> Varchar,
        description -> Text,
        category -> Nullable<Varchar>,
        images -> Array<Text>,
        why_this_product -> Text,
        what_does_it_do -> Text,
        features -> Array<Text>,
        use_cases -> Array<Text>,
        sku -> Varchar,
        vesa -> Varchar,
        max_weight -> Varchar,
        screen_size -> Varchar,
        adjustments -> Varchar,
        technical_drawing -> Varchar,
        installation_manual -> Varchar,
        technical_data_sheet -> Varchar,
        brochure -> Varchar,
        material -> Varchar,
        certifications -> Array<Text>,
        video_url -> Varchar,
        fusion_url -> Varchar,
        application -> Varchar,
        compatibility -> Varchar,
        finish -> Varchar,
        published -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    users (id) {
        id -> Uuid,
        email -> Varchar,
        name -> Varchar,
        password_hash -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    contact_queries (id) {
        id -> Uuid,
        first_name -> Varchar,
        last_name -> Varchar,
        email -> Varchar,
        phone_number -> Varchar,
        subject -> Varchar,
        message -> Text,
        status -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(products, users, contact_queries);
