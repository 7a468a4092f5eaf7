// Hardcoded baseline catalog used on (re)initialization and reset

use crate::models::Product;

#[allow(clippy::too_many_arguments)]
fn product(
    id: u64,
    name: &str,
    brand: &str,
    category: &str,
    finish: &str,
    shade: &str,
    price: f64,
    rating: f64,
    cruelty_free: bool,
    vegan: bool,
    stock: i64,
    description: &str,
) -> Product {
    Product {
        id,
        name: name.to_string(),
        brand: brand.to_string(),
        category: category.to_string(),
        finish: finish.to_string(),
        shade: shade.to_string(),
        price,
        rating,
        cruelty_free,
        vegan,
        stock,
        description: description.to_string(),
        image_url: None,
        image: None,
    }
}

/// Eight real-brand products, ids 1 through 8
pub fn baseline_catalog() -> Vec<Product> {
    vec![
        product(
            1,
            "Liquid Blush",
            "Rare Beauty",
            "Face",
            "Satin",
            "Happy",
            115.0,
            4.8,
            true,
            true,
            15,
            "Highly pigmented liquid blush that blends easily.",
        ),
        product(
            2,
            "Velvet Liquid Lipstick",
            "Fenty Beauty",
            "Lips",
            "Matte",
            "Pink Matter",
            119.0,
            4.7,
            true,
            true,
            20,
            "Long-wearing matte liquid lipstick.",
        ),
        product(
            3,
            "Butter Gloss",
            "NYX",
            "Lips",
            "Glossy",
            "Crème Brulee",
            39.0,
            4.3,
            true,
            false,
            40,
            "Creamy lip gloss with a soft tint.",
        ),
        product(
            4,
            "Powder Kiss Lipstick",
            "MAC",
            "Lips",
            "Soft matte",
            "Sultry Move",
            99.0,
            4.6,
            false,
            false,
            18,
            "Comfortable blurred finish for everyday wear.",
        ),
        product(
            5,
            "Afterglow Liquid Blush",
            "NARS",
            "Face",
            "Glow",
            "Orgasm",
            135.0,
            4.7,
            false,
            false,
            12,
            "Luminous liquid blush with a healthy flush.",
        ),
        product(
            6,
            "Halo Glow Blush Wand",
            "e.l.f.",
            "Face",
            "Glow",
            "Pink-Me-Up",
            49.0,
            4.5,
            true,
            true,
            28,
            "Wand-applied blush with a healthy sheen.",
        ),
        product(
            7,
            "SuperStay Vinyl Ink",
            "Maybelline",
            "Lips",
            "Glossy",
            "Lippy",
            55.0,
            4.4,
            false,
            false,
            35,
            "High-impact vinyl color that stays put.",
        ),
        product(
            8,
            "Infallible Fresh Wear Blush",
            "L'Oréal",
            "Face",
            "Natural",
            "Confident Pink",
            69.0,
            4.2,
            false,
            false,
            26,
            "Sweat- and transfer-resistant blush.",
        ),
    ]
}
