/// Highest base stat in the games, used to scale stat bars
pub const MAX_BASE_STAT: u32 = 255;

/// Upper-case the first character: `pikachu` -> `Pikachu`
pub fn display_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Zero-padded Pokédex number: 25 -> `#025`
pub fn dex_number(id: u32) -> String {
    format!("#{:03}", id)
}

/// Decimetres to metres with one decimal
pub fn height_m(decimetres: u32) -> String {
    format!("{:.1} m", decimetres as f64 / 10.0)
}

/// Hectograms to kilograms with one decimal
pub fn weight_kg(hectograms: u32) -> String {
    format!("{:.1} kg", hectograms as f64 / 10.0)
}

/// Fraction of the stat bar to fill, capped at 1.0
pub fn stat_ratio(base_stat: u32) -> f64 {
    (base_stat as f64 / MAX_BASE_STAT as f64).min(1.0)
}

/// Link label for a variety or form: `pikachu-gmax` -> `pikachu gmax`
pub fn link_label(name: &str) -> String {
    name.replace('-', " ")
}
