//! Diesel table definitions for the ledger schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts.
    accounts (id) {
        /// Store-assigned identifier (BIGSERIAL).
        id -> Int8,
        /// Account holder name, at most 100 characters.
        #[max_length = 100]
        name -> Varchar,
        /// Email address; unique.
        identity_key -> Text,
        /// NUMERIC(20, 4), never negative.
        balance -> Numeric,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Committed transfers. Rows are never updated or deleted.
    transfers (id) {
        id -> Int8,
        from_account_id -> Int8,
        to_account_id -> Int8,
        /// NUMERIC(20, 4), strictly positive.
        amount -> Numeric,
        created_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(accounts, transfers);
