pub mod cart {

    pub const QUANTITY_MIN: i32 = 1;

    pub const QUANTITY_MAX: i32 = 10;
}

pub mod catalog {

    pub const CATEGORIES: &[&str] =
        &["Men", "Women", "Kids", "Electronics", "Accessories", "Other"];

    pub const DEFAULT_PAGE_SIZE: u64 = 12;
}

pub mod orders {

    pub const STATUSES: &[&str] = &["pending", "processing", "shipped", "delivered", "cancelled"];

    pub const PAYMENT_METHODS: &[&str] = &["cash", "online"];

    pub const DASHBOARD_RECENT_LIMIT: u64 = 5;
}

pub mod auth {

    pub const SESSION_COOKIE: &str = "jwt";
}

pub mod admin {

    pub const USER_PAGE_SIZE: u64 = 20;
}
