//! Word & Category Tables
//!
//! Immutable constant tables shared by the language games. Loaded once at
//! compile time and injected by reference; never mutated at runtime, so
//! every player sees the identical pool.

/// Four-letter dictionary for the word-ladder game.
///
/// Curated for connectivity: most words have at least one one-letter
/// neighbor, so breadth-first pair searches rarely fall back.
pub const WORDS_4: &[&str] = &[
    "back", "bake", "ball", "band", "bank", "bare", "bark", "barn", "base", "bath",
    "bead", "beam", "bean", "bear", "beat", "bell", "belt", "bend", "best", "bike",
    "bill", "bird", "bite", "boat", "bold", "bolt", "bond", "bone", "book", "boot",
    "bore", "born", "bowl", "burn", "bush", "cake", "call", "calm", "came", "camp",
    "card", "care", "cart", "case", "cash", "cast", "cave", "cell", "chat", "chip",
    "coal", "coat", "code", "coin", "cold", "come", "cook", "cool", "cope", "copy",
    "cord", "core", "corn", "cost", "crow", "dare", "dark", "dart", "date", "dawn",
    "dead", "deal", "dear", "deep", "deer", "dish", "dive", "dock", "dome", "done",
    "door", "dose", "down", "draw", "drop", "drum", "duck", "dull", "dust", "earn",
    "ease", "east", "edge", "face", "fact", "fade", "fail", "fair", "fall", "fame",
    "farm", "fast", "fate", "fear", "feed", "feel", "feet", "fell", "felt", "file",
    "fill", "find", "fine", "fire", "firm", "fish", "fist", "five", "flat", "flow",
    "fold", "folk", "food", "fool", "foot", "ford", "fore", "fork", "form", "fort",
    "gain", "game", "gate", "gave", "gear", "gift", "girl", "give", "goal", "goat",
    "gold", "gone", "good", "gown", "grab", "gray", "grew", "grid", "grim", "grip",
    "grow", "hair", "half", "hall", "hand", "hang", "hard", "harm", "hate", "have",
    "head", "heal", "heap", "hear", "heat", "heel", "held", "help", "herd", "here",
    "hero", "hide", "high", "hill", "hint", "hire", "hold", "hole", "home", "hope",
    "horn", "hose", "host", "hunt", "hurt", "iron", "keen", "keep", "kick", "kind",
    "king", "kiss", "knee", "knew", "know", "lace", "lack", "lake", "lamp", "land",
    "lane", "last", "late", "lawn", "lead", "leaf", "lean", "leap", "left", "lend",
    "lens", "less", "life", "lift", "like", "lime", "line", "link", "lion", "list",
    "live", "load", "loaf", "loan", "lock", "long", "look", "loop", "lord", "lose",
    "loss", "lost", "loud", "love", "luck", "made", "mail", "main", "make", "male",
    "mall", "mark", "mask", "mass", "mast", "mate", "maze", "meal", "mean", "meat",
    "meet", "melt", "mend", "mild", "mile", "milk", "mill", "mind", "mine", "mint",
    "miss", "mist", "mode", "mole", "mood", "moon", "more", "most", "move", "nail",
    "name", "near", "neat", "neck", "need", "nest", "news", "nice", "nine", "none",
    "noon", "nose", "note", "pace", "pack", "page", "paid", "pain", "pair", "pale",
    "palm", "park", "part", "pass", "past", "path", "peak", "pear", "peel", "pick",
    "pile", "pill", "pine", "pink", "pipe", "plan", "play", "plot", "plug", "pole",
    "pond", "pool", "poor", "pork", "port", "pose", "post", "pour", "pull", "pump",
    "pure", "push", "race", "rack", "rage", "raid", "rail", "rain", "rank", "rare",
    "rate", "read", "real", "rear", "rent", "rest", "rice", "rich", "ride", "ring",
    "ripe", "rise", "risk", "road", "roam", "roar", "rock", "rode", "role", "roll",
    "roof", "room", "root", "rope", "rose", "rule", "rush", "sack", "safe", "sail",
    "sale", "salt", "same", "sand", "save", "seal", "seat", "seed", "seek", "seem",
    "seen", "self", "sell", "send", "sent", "ship", "shop", "shot", "show", "side",
    "sign", "silk", "sing", "site", "size", "skin", "slip", "slow", "snow", "soap",
    "sock", "soft", "soil", "sold", "sole", "some", "song", "soon", "sore", "sort",
    "soul", "soup", "sour", "spin", "spot", "star", "stay", "stem", "step", "stir",
    "stop", "sure", "swim", "tail", "take", "tale", "talk", "tall", "tame", "tank",
    "tape", "task", "team", "tear", "tell", "tend", "tent", "term", "test", "text",
    "thin", "tide", "tile", "till", "time", "tiny", "tire", "toad", "told", "toll",
    "tone", "took", "tool", "torn", "toss", "town", "trap", "tray", "tree", "trim",
    "trip", "true", "tube", "tune", "turn", "twin", "vast", "vine", "vote", "wage",
    "wait", "wake", "walk", "wall", "want", "ward", "ware", "warm", "warn", "wash",
    "wave", "weak", "wear", "week", "well", "went", "west", "wide", "wife", "wild",
    "will", "wind", "wine", "wing", "wire", "wise", "wish", "wolf", "wood", "wool",
    "word", "wore", "work", "worm", "worn", "yard", "yarn", "year", "zone",
];

/// Dictionary for the anagram game (lengths 3 through 8).
pub const ANAGRAM_DICT: &[&str] = &[
    // 3 letters
    "ace", "age", "ago", "and", "ant", "ape", "arc", "arm", "art", "ate",
    "ban", "bar", "bat", "bet", "cab", "cad", "can", "car", "cat", "cry",
    "den", "ear", "eat", "end", "era", "fog", "gin", "gun", "gut", "hip",
    "his", "hit", "hug", "hut", "ire", "lad", "lap", "lay", "led", "let",
    "lie", "lit", "mat", "nab", "nag", "nap", "net", "new", "nose", "not",
    "nut", "oar", "one", "ore", "pal", "pan", "pat", "pea", "pen", "pet",
    "pie", "ram", "rag", "ran", "rat", "ray", "red", "rip", "rot", "run",
    "sat", "say", "sea", "set", "sin", "sip", "sir", "sit", "sly", "son",
    "sun", "tam", "tan", "tap", "tar", "tea", "ten", "tie", "tin", "toe",
    "ton", "try", "vie", "wet", "win", "wit",
    // 4 letters
    "able", "airs", "ante", "bake", "bank", "barn", "blank", "bran", "cart",
    "cast", "clay", "crab", "dance", "dare", "darn", "dear", "earn", "evil",
    "gain", "gate", "gear", "gone", "grand", "gust", "hunt", "hurt", "isle",
    "lace", "land", "lane", "last", "late", "lean", "lies", "light", "live",
    "lung", "lush", "mast", "mate", "meat", "near", "neat", "night", "none",
    "note", "pane", "pant", "plan", "rage", "rail", "rain", "rang", "rant",
    "rate", "read", "real", "rent", "rest", "rise", "rose", "rude", "salt",
    "sign", "sing", "slug", "star", "stay", "suit", "tale", "tank", "team",
    "tear", "tile", "tire", "train", "tray", "tune", "turn", "twin", "unit",
    "veil", "vile", "wine", "wipe", "wire", "wise", "wish",
    // 5 letters
    "agent", "alert", "alter", "angle", "anger", "avert", "caned", "clean",
    "giant", "grain", "groan", "heart", "inter", "large", "later", "learn",
    "liver", "organ", "petal", "plane", "plant", "plate", "pleat", "range",
    "shine", "sight", "slate", "smart", "snore", "steam", "sting", "stone",
    "store", "storm", "swipe", "tamer", "trail", "trial", "under", "water",
    "wheat", "write",
    // 6 letters
    "antler", "branch", "candle", "danger", "gander", "garden", "hunter",
    "master", "mentor", "orange", "purist", "sermon", "silver", "sliver",
    "tangle", "winter",
    // 7 letters
    "crystal", "lantern", "monster", "thunder", "whisper",
    // 8 letters
    "sunlight", "triangle",
];

/// Curated seed words (6-8 letters) for the anagram rack.
pub const ANAGRAM_SEEDS: &[&str] = &[
    "planet", "stream", "orange", "candle", "winter", "garden", "silver",
    "branch", "crystal", "thunder", "monster", "lantern", "whisper",
    "blanket", "triangle", "sunlight",
];

/// Vowels used for rack padding.
pub const VOWELS: &[char] = &['a', 'e', 'i', 'o', 'u'];

/// Consonants used for rack padding.
pub const CONSONANTS: &[char] = &[
    'b', 'c', 'd', 'f', 'g', 'h', 'k', 'l', 'm', 'n', 'p', 'r', 's', 't', 'w',
];

/// Category tables for the word-sorting game. Every word appears in
/// exactly one category.
pub const CATEGORIES: &[(&str, &[&str])] = &[
    ("animals", &["tiger", "horse", "eagle", "shark", "rabbit", "camel", "otter", "moose"]),
    ("fruits", &["apple", "mango", "grape", "peach", "banana", "cherry", "lemon", "plum"]),
    ("vegetables", &["carrot", "potato", "onion", "spinach", "celery", "radish", "turnip", "leek"]),
    ("instruments", &["piano", "violin", "guitar", "trumpet", "flute", "cello", "drums", "banjo"]),
    ("sports", &["soccer", "tennis", "boxing", "hockey", "rowing", "rugby", "karate", "fencing"]),
    ("weather", &["blizzard", "breeze", "frost", "drizzle", "cyclone", "hail", "sleet", "monsoon"]),
    ("tools", &["hammer", "wrench", "chisel", "pliers", "shovel", "drill", "trowel", "crowbar"]),
    ("colors", &["crimson", "amber", "violet", "indigo", "scarlet", "teal", "maroon", "olive"]),
];

// =============================================================================
// TESTS
// =============================================================================
