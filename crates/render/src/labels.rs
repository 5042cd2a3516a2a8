use overlay_world::{Entity, LootItem};

/// Compact price: `1.25M`, `45K`, or the plain number below a thousand.
pub fn format_price(price: i64) -> String {
    if price < 1_000 {
        return price.to_string();
    }
    // Thousands that round up to 1000K roll over into millions.
    let thousands = (price as f64 / 1_000.0).round() as i64;
    if thousands < 1_000 {
        return format!("{thousands}K");
    }
    let millions = format!("{:.2}", price as f64 / 1_000_000.0);
    let trimmed = millions.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed}M")
}

/// `"{name} ({distance}m)"` with the distance rounded to whole metres.
pub fn name_label(entity: &Entity, distance: f32) -> String {
    format!("{} ({}m)", entity.display_name(), distance.round() as i64)
}

/// Loot label. Important items show the bare name even with prices on.
pub fn loot_label(item: &LootItem, with_price: bool) -> String {
    if with_price && !item.important {
        format!("{} ({})", item.short_name, format_price(item.price))
    } else {
        item.short_name.clone()
    }
}
