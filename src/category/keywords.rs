use crate::models::Category;

/// Built-in keyword sets in priority order.
///
/// Keywords are lowercase substrings of the space-padded product name after
/// folding (lowercased, punctuation turned into spaces). A leading or trailing
/// space in a keyword therefore acts as a word boundary (`" tv"`, `"dell "`),
/// and `43"/TV` or `Dell-Inspiron` still match. Short tokens that occur inside unrelated
/// words (`pc`, `ram`, `pan`, `hair` in "chair") are left out.
pub const DEFAULT_RULES: &[(Category, &[&str])] = &[
    (
        Category::HealthBeauty,
        &[
            "nivea", "antiperspirant", "deodorant", "perfume", "fragrance", "eau de",
            "shampoo", "conditioner", "lotion", "cream", "serum", "makeup", "lipstick",
            "mascara", "eyeliner", "skin care", "hair dryer", "hair oil",
            "hair straightener", "face wash", "sunscreen", "body spray", "shaver",
            "trimmer", "toothbrush", "toothpaste", "vitamin", "garnier", "loreal",
            "l'oreal", "vaseline", "dove",
        ],
    ),
    (
        Category::Fashion,
        &[
            "t-shirt", "shirt", "dress", "jeans", "trousers", "pants", "jacket", "hoodie",
            "sweatshirt", "shoes", "sneakers", "sandals", "slippers", "handbag",
            "backpack", "wallet", "watch", "sunglasses", "socks", "underwear", "boxer",
            "pajama", "abaya", "hijab", "belt", "necklace", "bracelet", "earrings",
        ],
    ),
    (
        Category::PhonesTablets,
        &[
            "smartphone", "mobile phone", "iphone", "galaxy", "tablet", "ipad", "redmi",
            "xiaomi", "oppo", "realme", "infinix", "tecno", "huawei", "nokia",
            "power bank", "screen protector", "phone case", "charger",
        ],
    ),
    (
        Category::Appliances,
        &[
            "refrigerator", "fridge", "freezer", "washing machine", "dishwasher",
            "microwave", "oven", "air fryer", "blender", "mixer", "kettle", "toaster",
            "steam iron", "vacuum", "air conditioner", "stand fan", "ceiling fan",
            "heater", "water dispenser", "cooker", "juicer", "coffee maker",
            "food processor",
        ],
    ),
    (
        Category::BabyProducts,
        &[
            "baby", "diaper", "pampers", "infant", "toddler", "stroller",
            "feeding bottle", "pacifier", "newborn", "wet wipes",
        ],
    ),
    (
        Category::Computing,
        &[
            "laptop", "notebook", "computer", "desktop", "monitor", "keyboard", "mouse",
            "printer", "router", "flash drive", "flash memory", "usb", "hard drive",
            "ssd", "memory card", "webcam", "lenovo", "dell ", "asus", "acer",
        ],
    ),
    (
        Category::Gaming,
        &[
            "playstation", "ps4", "ps5", "xbox", "nintendo", "gaming", "controller",
            "gamepad", "joystick", "console", "video game",
        ],
    ),
    (
        Category::HomeFurniture,
        &[
            "sofa", "chair", "dining table", "side table", "coffee table", "mattress",
            "pillow", "blanket", "bed sheet", "bedsheet", "duvet", "curtain", "carpet",
            "rug", "towel", "lamp", "shelf", "storage box", "cookware", "frying pan",
            "dinnerware", "mug", "kitchen", "bathroom", "decor", "furniture",
        ],
    ),
    (
        Category::Supermarket,
        &[
            "rice", "sugar", "pasta", "nescafe", "lipton", "coffee", "green tea",
            "tea bags", "chocolate", "biscuit", "cereal", "detergent", "persil", "ariel",
            "dishwashing", "tissue", "mineral water", "juice", "cooking oil",
            "olive oil", "snack", "milk", "soap",
        ],
    ),
    (
        Category::TelevisionAudio,
        &[
            "television", "smart tv", "led tv", " tv", "speaker", "headphone",
            "earphone", "earbuds", "soundbar", "home theater", "receiver", "projector",
            "airpods", "subwoofer",
        ],
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rules_cover_every_category_except_fallback() {
        let categories: Vec<Category> = DEFAULT_RULES.iter().map(|(c, _)| *c).collect();
        let expected: Vec<Category> = Category::ALL
            .into_iter()
            .filter(|c| *c != Category::Other)
            .collect();
        assert_eq!(categories, expected);
    }

    #[test]
    fn test_keywords_are_lowercase_and_non_empty() {
        for (category, words) in DEFAULT_RULES {
            assert!(!words.is_empty(), "{} has no keywords", category);
            for word in words.iter() {
                assert!(!word.trim().is_empty());
                assert_eq!(*word, word.to_lowercase(), "{} keyword {:?}", category, word);
            }
        }
    }
}
