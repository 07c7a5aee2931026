#![forbid(unsafe_code)]

pub(super) const SQL: &str = r#"

        CREATE TABLE IF NOT EXISTS events (
          event_id INTEGER PRIMARY KEY AUTOINCREMENT,
          celeb_user_id INTEGER NOT NULL
            REFERENCES users(user_id) ON DELETE RESTRICT,
          name TEXT NOT NULL,
          event_date TEXT NOT NULL,
          event_time TEXT,
          guests_num INTEGER NOT NULL DEFAULT 0 CHECK(guests_num >= 0),
          status TEXT NOT NULL,
          created_at_ms INTEGER NOT NULL,
          updated_at_ms INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS event_venues (
          venue_id INTEGER PRIMARY KEY AUTOINCREMENT,
          event_id INTEGER NOT NULL
            REFERENCES events(event_id) ON DELETE CASCADE,
          name TEXT NOT NULL,
          max_guests INTEGER CHECK(max_guests IS NULL OR max_guests >= 0),
          agreed_price INTEGER NOT NULL CHECK(agreed_price >= 0),
          has_sound INTEGER NOT NULL DEFAULT 0 CHECK(has_sound IN (0, 1)),
          sound_price INTEGER NOT NULL DEFAULT 0 CHECK(sound_price >= 0),
          has_design INTEGER NOT NULL DEFAULT 0 CHECK(has_design IN (0, 1)),
          design_price INTEGER NOT NULL DEFAULT 0 CHECK(design_price >= 0),
          has_lighting INTEGER NOT NULL DEFAULT 0 CHECK(has_lighting IN (0, 1)),
          lighting_price INTEGER NOT NULL DEFAULT 0 CHECK(lighting_price >= 0),
          has_bar INTEGER NOT NULL DEFAULT 0 CHECK(has_bar IN (0, 1)),
          bar_price INTEGER NOT NULL DEFAULT 0 CHECK(bar_price >= 0),
          is_selected INTEGER NOT NULL DEFAULT 0 CHECK(is_selected IN (0, 1)),
          created_at_ms INTEGER NOT NULL,
          updated_at_ms INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_event_venues_event
          ON event_venues(event_id);

        -- At most one selected venue per event.
        CREATE UNIQUE INDEX IF NOT EXISTS ux_event_venues_selected
          ON event_venues(event_id) WHERE is_selected = 1;

        CREATE TABLE IF NOT EXISTS event_suppliers (
          list_id INTEGER PRIMARY KEY AUTOINCREMENT,
          event_id INTEGER NOT NULL
            REFERENCES events(event_id) ON DELETE CASCADE,
          supplier_id INTEGER NOT NULL
            REFERENCES suppliers(supplier_id) ON DELETE RESTRICT,
          contract_id INTEGER
            REFERENCES contracts(contract_id) ON DELETE RESTRICT,
          supplier_name_snapshot TEXT NOT NULL,
          payment_terms_snapshot TEXT,
          contract_total_snapshot INTEGER,
          agreed_price INTEGER NOT NULL CHECK(agreed_price >= 0),
          is_confirmed INTEGER NOT NULL DEFAULT 0 CHECK(is_confirmed IN (0, 1)),
          confirmed_at_ms INTEGER,
          created_at_ms INTEGER NOT NULL,
          updated_at_ms INTEGER NOT NULL,
          UNIQUE(event_id, supplier_id)
        );

        CREATE INDEX IF NOT EXISTS idx_event_suppliers_supplier
          ON event_suppliers(supplier_id);

        CREATE INDEX IF NOT EXISTS idx_event_suppliers_contract
          ON event_suppliers(contract_id);

        -- Snapshot columns and identity are frozen once written.
        CREATE TRIGGER IF NOT EXISTS event_suppliers_snapshot_frozen
        BEFORE UPDATE OF event_id, supplier_id, contract_id, supplier_name_snapshot,
                         payment_terms_snapshot, contract_total_snapshot
        ON event_suppliers
        BEGIN
          SELECT RAISE(ABORT, 'event supplier snapshot is immutable');
        END;
"#;
