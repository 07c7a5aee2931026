#![forbid(unsafe_code)]

pub(super) const SQL: &str = r#"

        CREATE TABLE IF NOT EXISTS suppliers (
          supplier_id INTEGER PRIMARY KEY AUTOINCREMENT,
          name TEXT NOT NULL UNIQUE,
          supplier_type TEXT NOT NULL,
          payment_terms TEXT,
          is_active INTEGER NOT NULL DEFAULT 1 CHECK(is_active IN (0, 1)),
          created_at_ms INTEGER NOT NULL,
          updated_at_ms INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS contracts (
          contract_id INTEGER PRIMARY KEY AUTOINCREMENT,
          supplier_id INTEGER NOT NULL
            REFERENCES suppliers(supplier_id) ON DELETE RESTRICT,
          valid_from TEXT NOT NULL,
          valid_to TEXT,
          total_price INTEGER NOT NULL CHECK(total_price >= 0),
          created_at_ms INTEGER NOT NULL,
          updated_at_ms INTEGER NOT NULL,
          CHECK(valid_to IS NULL OR valid_to >= valid_from)
        );

        CREATE INDEX IF NOT EXISTS idx_contracts_supplier
          ON contracts(supplier_id);
"#;
