use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create user_profiles table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_profiles (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            user_id UUID NOT NULL UNIQUE,
            first_name VARCHAR(255) NOT NULL,
            last_name VARCHAR(255) NOT NULL,
            phone VARCHAR(32) NULL,
            user_type VARCHAR(32) NOT NULL CHECK (user_type IN ('player', 'venue_owner')),
            preferred_sports TEXT[] NOT NULL DEFAULT '{}',
            language VARCHAR(8) NULL,
            city VARCHAR(255) NULL,
            region VARCHAR(255) NULL,
            lat DOUBLE PRECISION NULL,
            lng DOUBLE PRECISION NULL,
            is_verified BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create auth_sessions table. Sessions are issued by the external auth
    // collaborator; this table only supports token -> user id resolution.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS auth_sessions (
            token VARCHAR(255) PRIMARY KEY,
            user_id UUID NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create venues table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS venues (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            owner_id UUID NOT NULL,
            name VARCHAR(255) NOT NULL,
            description TEXT NOT NULL,
            address TEXT NOT NULL,
            city VARCHAR(255) NOT NULL,
            region VARCHAR(255) NOT NULL,
            lat DOUBLE PRECISION NOT NULL,
            lng DOUBLE PRECISION NOT NULL,
            phone VARCHAR(32) NOT NULL,
            email VARCHAR(255) NULL,
            website VARCHAR(255) NULL,
            images UUID[] NOT NULL DEFAULT '{}',
            amenities TEXT[] NOT NULL DEFAULT '{}',
            opening_hours JSONB NOT NULL,
            rating DOUBLE PRECISION NULL,
            review_count INTEGER NULL,
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            is_verified BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create courts table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS courts (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            venue_id UUID NOT NULL REFERENCES venues(id),
            name VARCHAR(255) NOT NULL,
            sport VARCHAR(64) NOT NULL,
            surface VARCHAR(64) NOT NULL,
            size VARCHAR(32) NULL,
            capacity INTEGER NOT NULL,
            price_per_hour DOUBLE PRECISION NOT NULL,
            images UUID[] NOT NULL DEFAULT '{}',
            amenities TEXT[] NOT NULL DEFAULT '{}',
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            description TEXT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create availability table. The (court_id, date, time_slot) triple is
    // the natural key; bulk generation relies on the unique constraint for
    // idempotent inserts.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS availability (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            court_id UUID NOT NULL REFERENCES courts(id),
            date DATE NOT NULL,
            time_slot VARCHAR(5) NOT NULL,
            duration INTEGER NOT NULL,
            is_available BOOLEAN NOT NULL DEFAULT TRUE,
            price DOUBLE PRECISION NOT NULL,
            special_offer JSONB NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT availability_triple_key UNIQUE (court_id, date, time_slot)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create bookings table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS bookings (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            user_id UUID NOT NULL,
            court_id UUID NOT NULL REFERENCES courts(id),
            venue_id UUID NOT NULL REFERENCES venues(id),
            date DATE NOT NULL,
            time_slot VARCHAR(5) NOT NULL,
            duration INTEGER NOT NULL,
            end_time VARCHAR(5) NOT NULL,
            total_price DOUBLE PRECISION NOT NULL,
            status VARCHAR(32) NOT NULL,
            payment_status VARCHAR(32) NOT NULL,
            payment_method VARCHAR(32) NULL,
            payment_id VARCHAR(255) NULL,
            players JSONB NOT NULL DEFAULT '[]',
            notes TEXT NULL,
            qr_code VARCHAR(255) NOT NULL,
            cancelled_at TIMESTAMP WITH TIME ZONE NULL,
            cancellation_reason TEXT NULL,
            refund_amount DOUBLE PRECISION NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // At most one non-cancelled booking per slot triple. This partial index
    // is what makes the check-then-insert in booking creation safe under
    // concurrency: the losing writer's insert fails.
    sqlx::query(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS idx_bookings_active_slot
        ON bookings(court_id, date, time_slot)
        WHERE status <> 'cancelled';
        "#,
    )
    .execute(pool)
    .await?;

    // Create reviews table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS reviews (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            user_id UUID NOT NULL,
            venue_id UUID NOT NULL REFERENCES venues(id),
            booking_id UUID NULL REFERENCES bookings(id),
            rating DOUBLE PRECISION NOT NULL,
            comment TEXT NULL,
            cleanliness DOUBLE PRECISION NOT NULL,
            facilities DOUBLE PRECISION NOT NULL,
            staff DOUBLE PRECISION NOT NULL,
            value DOUBLE PRECISION NOT NULL,
            is_verified BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT one_review_per_user_venue UNIQUE (user_id, venue_id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_venues_owner_id ON venues(owner_id);
        CREATE INDEX IF NOT EXISTS idx_venues_city ON venues(city);
        CREATE INDEX IF NOT EXISTS idx_venues_region ON venues(region);
        CREATE INDEX IF NOT EXISTS idx_courts_venue_id ON courts(venue_id);
        CREATE INDEX IF NOT EXISTS idx_courts_sport ON courts(sport);
        CREATE INDEX IF NOT EXISTS idx_courts_venue_sport ON courts(venue_id, sport);
        CREATE INDEX IF NOT EXISTS idx_availability_court_date ON availability(court_id, date);
        CREATE INDEX IF NOT EXISTS idx_bookings_user_id ON bookings(user_id);
        CREATE INDEX IF NOT EXISTS idx_bookings_court_id ON bookings(court_id);
        CREATE INDEX IF NOT EXISTS idx_bookings_venue_id ON bookings(venue_id);
        CREATE INDEX IF NOT EXISTS idx_bookings_date ON bookings(date);
        CREATE INDEX IF NOT EXISTS idx_bookings_user_status ON bookings(user_id, status);
        CREATE INDEX IF NOT EXISTS idx_reviews_venue_id ON reviews(venue_id);
        CREATE INDEX IF NOT EXISTS idx_reviews_user_id ON reviews(user_id);
        CREATE INDEX IF NOT EXISTS idx_auth_sessions_user_id ON auth_sessions(user_id);
        "#,
    )
    .execute(pool)
    .await?;

    info!("Database schema initialized successfully.");
    Ok(())
}
