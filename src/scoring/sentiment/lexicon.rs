//! Embedded word lists for the sentiment rules.
//!
//! Valences are mean human ratings on a -4 (most negative) to +4 (most
//! positive) scale. Entries are lower-case; emoticons are matched as typed.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Increment applied by an intensifying modifier ("very good").
pub const BOOSTER_INCREMENT: f64 = 0.293;

/// Decrement applied by a dampening modifier ("slightly good").
pub const BOOSTER_DECREMENT: f64 = -0.293;

/// Extra emphasis of an ALL-CAPS word in otherwise mixed-case text.
pub const CAPS_INCREMENT: f64 = 0.733;

/// Factor applied to a valence under negation.
pub const NEGATION_SCALAR: f64 = -0.74;

const VALENCES: &[(&str, f64)] = &[
    (":(", -1.9), (":)", 2.0), (":-(", -1.5), (":-)", 1.3), (":/", -1.4), (":d", 2.3),
    (":p", 1.4), (";)", 2.2), (";-)", 1.8), ("<3", 1.9), ("xd", 2.2),
    ("abandon", -1.9), ("abandoned", -2.0), ("abuse", -3.2), ("abusive", -3.2),
    ("accept", 1.6), ("accepted", 1.1), ("accomplish", 1.8), ("accomplished", 1.9),
    ("ache", -1.6), ("aching", -2.2), ("admire", 2.1), ("admired", 2.3), ("adorable", 2.2),
    ("advantage", 1.0), ("afraid", -2.2), ("aggravated", -2.5), ("aggressive", -0.6),
    ("agony", -1.8), ("agree", 1.5), ("agreed", 1.1), ("alarm", -1.4), ("alarmed", -1.4),
    ("alone", -1.0), ("amazed", 2.2), ("amazing", 2.8), ("amused", 1.6), ("anger", -2.7),
    ("angry", -2.3), ("anguish", -2.9), ("annoy", -1.9), ("annoyed", -1.6),
    ("annoying", -1.8), ("anxiety", -0.7), ("anxious", -1.0), ("apologize", -0.2),
    ("appreciate", 1.7), ("appreciated", 2.3), ("appreciation", 2.3), ("approve", 1.8),
    ("approved", 1.8), ("argue", -1.4), ("argument", -1.5), ("ashamed", -2.1),
    ("astonished", 1.6), ("attack", -2.1), ("attractive", 1.9), ("awesome", 3.1),
    ("awful", -2.0), ("awkward", -0.6), ("bad", -2.5), ("badly", -2.1), ("beautiful", 2.9),
    ("benefit", 2.0), ("best", 3.2), ("betrayed", -3.0), ("better", 1.9), ("bitter", -1.8),
    ("blame", -1.4), ("bless", 1.8), ("blessed", 2.9), ("bored", -1.1), ("boring", -1.3),
    ("bother", -1.4), ("bothered", -1.2), ("brave", 2.4), ("brilliant", 2.8),
    ("broken", -2.1), ("bug", -0.6), ("calm", 1.3), ("care", 2.2), ("careful", 0.6),
    ("careless", -1.5), ("celebrate", 2.7), ("celebration", 2.2), ("chaos", -2.7),
    ("charming", 2.8), ("cheer", 2.3), ("cheerful", 2.5), ("cheers", 2.1), ("clever", 2.0),
    ("comfort", 1.5), ("comfortable", 1.5), ("complain", -1.5), ("complaint", -1.2),
    ("concerned", -0.7), ("confident", 2.2), ("confused", -1.3), ("confusing", -0.9),
    ("congrats", 2.4), ("congratulate", 2.2), ("congratulations", 2.9), ("cool", 1.3),
    ("cordial", 1.6), ("courage", 2.2), ("crap", -1.6), ("crash", -1.7), ("crazy", -1.4),
    ("cried", -1.6), ("crisis", -3.1), ("critical", -1.3), ("cruel", -2.8), ("cry", -2.1),
    ("crying", -2.1), ("cute", 2.0), ("damage", -2.2), ("damn", -1.7), ("danger", -2.4),
    ("dangerous", -2.1), ("dead", -3.3), ("dear", 1.6), ("delay", -1.3), ("delayed", -0.9),
    ("delight", 2.9), ("delighted", 2.3), ("delightful", 2.8), ("denied", -1.6),
    ("depressed", -2.3), ("depressing", -1.6), ("desperate", -1.3), ("despair", -2.6),
    ("destroy", -2.6), ("destroyed", -2.6), ("devastated", -3.1), ("difficult", -1.5),
    ("disappoint", -1.7), ("disappointed", -1.9), ("disappointing", -2.2),
    ("disappointment", -2.3), ("disaster", -3.1), ("disgusted", -2.4), ("disgusting", -2.4),
    ("dislike", -1.6), ("dismayed", -1.9), ("distress", -2.4), ("distressed", -1.8),
    ("disturbed", -1.6), ("doubt", -1.5), ("dread", -2.0), ("dreadful", -2.7),
    ("eager", 1.5), ("ease", 1.5), ("easy", 1.9), ("effective", 2.1), ("efficient", 1.8),
    ("embarrassed", -1.5), ("embarrassing", -1.6), ("encourage", 2.3),
    ("encouraged", 1.5), ("energetic", 1.9), ("enjoy", 2.2), ("enjoyed", 2.3),
    ("enraged", -3.4), ("enthusiastic", 1.9), ("error", -1.7), ("excellent", 2.7),
    ("excited", 1.4), ("excitement", 2.2), ("exciting", 2.2), ("exhausted", -1.5),
    ("fail", -2.5), ("failed", -2.3), ("failing", -2.3), ("failure", -2.3), ("fair", 1.3),
    ("faithful", 1.9), ("fake", -2.1), ("fantastic", 2.6), ("fault", -1.7), ("fear", -2.2),
    ("fearful", -2.2), ("fearless", 1.9), ("fine", 0.8), ("fool", -1.9), ("foolish", -1.1),
    ("forgive", 1.1), ("fortunate", 1.9), ("fortunately", 1.3), ("free", 2.3),
    ("friendly", 2.2), ("fright", -1.6), ("frightened", -1.9), ("frowning", -1.4),
    ("frustrated", -2.4), ("frustrating", -1.9), ("frustration", -2.1), ("fun", 2.3),
    ("funny", 1.9), ("furious", -2.7), ("generous", 2.3), ("gift", 1.9), ("glad", 2.0),
    ("gloomy", -1.9), ("glorious", 3.2), ("good", 1.9), ("gorgeous", 3.0),
    ("grateful", 2.0), ("gratitude", 2.3), ("great", 3.1), ("greatest", 3.2),
    ("grief", -2.2), ("grin", 2.1), ("grinning", 1.5), ("guilt", -1.1), ("guilty", -1.8),
    ("happiness", 2.6), ("happy", 2.7), ("harm", -2.5), ("harsh", -1.9), ("hate", -2.7),
    ("hated", -3.2), ("hatred", -3.2), ("heart", 1.3), ("heartbroken", -3.3),
    ("help", 1.7), ("helpful", 1.8), ("hero", 2.6), ("honest", 2.3), ("hope", 1.9),
    ("hopeful", 2.3), ("hopefully", 1.7), ("hopeless", -2.0), ("horrible", -2.5),
    ("horrified", -2.5), ("hostile", -2.2), ("hug", 2.1), ("humiliated", -2.2),
    ("hurt", -2.4), ("ignore", -1.5), ("ignored", -1.3), ("ill", -1.8), ("impatient", -1.2),
    ("important", 0.8), ("impressed", 2.1), ("impressive", 2.3), ("improve", 1.9),
    ("improved", 2.1), ("inconvenience", -1.5), ("insult", -2.3), ("insulted", -2.3),
    ("interest", 2.0), ("interested", 1.7), ("interesting", 1.7), ("irritated", -2.0),
    ("irritating", -2.0), ("jealous", -2.0), ("joke", 1.2), ("joy", 2.8), ("joyful", 2.9),
    ("kind", 2.4), ("kiss", 1.8), ("lame", -1.8), ("laugh", 2.6), ("laughing", 2.2),
    ("lazy", -1.5), ("like", 1.5), ("liked", 1.8), ("lol", 1.8), ("lonely", -1.5),
    ("lose", -1.7), ("loss", -1.3), ("lost", -1.3), ("love", 3.2), ("loved", 2.9),
    ("lovely", 2.8), ("loving", 2.9), ("luck", 2.0), ("lucky", 1.8), ("mad", -2.2),
    ("mess", -1.5), ("miserable", -2.2), ("miss", -0.6), ("missed", -1.2),
    ("mistake", -1.4), ("mistakes", -1.5), ("nasty", -2.6), ("negative", -2.7),
    ("nervous", -1.1), ("nice", 1.8), ("no", -1.2), ("offended", -1.0), ("ok", 1.2),
    ("okay", 0.9), ("optimistic", 1.3), ("outrage", -2.8), ("outraged", -2.5),
    ("outstanding", 3.0), ("pain", -2.3), ("painful", -1.9), ("panic", -2.3),
    ("party", 1.7), ("passionate", 2.4), ("pathetic", -2.7), ("peaceful", 2.2),
    ("pensive", 0.3), ("perfect", 2.7), ("pleasant", 2.3), ("please", 1.3),
    ("pleased", 1.9), ("pleasure", 2.7), ("poor", -2.1), ("popular", 1.8),
    ("positive", 2.6), ("pretty", 2.2), ("problem", -1.7), ("problems", -1.7),
    ("productive", 1.6), ("progress", 1.8), ("proud", 2.1), ("rage", -2.6), ("ready", 1.5),
    ("regret", -1.8), ("reject", -1.7), ("rejected", -2.3), ("relax", 1.9),
    ("relaxed", 2.2), ("relief", 2.1), ("relieved", 1.7), ("reliable", 1.9),
    ("respect", 2.1), ("rude", -2.0), ("sad", -2.1), ("sadly", -1.8), ("sadness", -1.9),
    ("safe", 1.9), ("satisfied", 1.8), ("scared", -1.9), ("scary", -2.2),
    ("screaming", -1.8), ("shame", -2.1), ("shock", -1.6), ("shocked", -1.3),
    ("sick", -2.3), ("sincere", 1.7), ("sincerely", 2.1), ("smile", 1.5), ("smiling", 2.1),
    ("sorrow", -2.4), ("sorry", -0.3), ("stress", -1.8), ("stressed", -1.4),
    ("stressful", -2.3), ("strong", 2.3), ("stupid", -2.4), ("success", 2.7),
    ("successful", 2.8), ("suffer", -2.5), ("super", 2.9), ("support", 1.7),
    ("supportive", 1.8), ("sure", 1.3), ("surprise", 1.1), ("sweet", 2.0),
    ("tears", -0.9), ("terrible", -2.1), ("terrific", 3.1), ("terrified", -3.0),
    ("thank", 1.5), ("thankful", 2.7), ("thanks", 1.9), ("threat", -2.4), ("tired", -1.9),
    ("tragic", -3.4), ("trouble", -1.7), ("true", 1.8), ("trust", 2.3), ("ugly", -2.3),
    ("unable", -1.2), ("unacceptable", -2.0), ("uncertain", -1.2), ("unfair", -2.1),
    ("unfortunate", -2.0), ("unfortunately", -1.4), ("unhappy", -1.8), ("upset", -1.6),
    ("urgent", -0.9), ("useful", 1.9), ("useless", -1.8), ("valuable", 2.1),
    ("victory", 2.8), ("violent", -2.9), ("warm", 0.9), ("warning", -1.4), ("weak", -1.9),
    ("weary", -1.1), ("welcome", 2.0), ("well", 1.1), ("win", 2.8), ("winner", 2.8),
    ("wish", 1.7), ("wonderful", 2.7), ("worried", -1.2), ("worry", -1.9),
    ("worrying", -1.4), ("worse", -2.1), ("worst", -3.1), ("worthless", -1.9),
    ("wow", 2.8), ("wrong", -2.1), ("yay", 2.4), ("yes", 1.7),
];

/// Modifiers that scale the next sentiment-bearing word.
const BOOSTERS: &[(&str, f64)] = &[
    ("absolutely", BOOSTER_INCREMENT), ("amazingly", BOOSTER_INCREMENT),
    ("awfully", BOOSTER_INCREMENT), ("completely", BOOSTER_INCREMENT),
    ("considerably", BOOSTER_INCREMENT), ("decidedly", BOOSTER_INCREMENT),
    ("deeply", BOOSTER_INCREMENT), ("enormously", BOOSTER_INCREMENT),
    ("entirely", BOOSTER_INCREMENT), ("especially", BOOSTER_INCREMENT),
    ("exceptionally", BOOSTER_INCREMENT), ("extremely", BOOSTER_INCREMENT),
    ("fabulously", BOOSTER_INCREMENT), ("fully", BOOSTER_INCREMENT),
    ("greatly", BOOSTER_INCREMENT), ("highly", BOOSTER_INCREMENT),
    ("hugely", BOOSTER_INCREMENT), ("incredibly", BOOSTER_INCREMENT),
    ("intensely", BOOSTER_INCREMENT), ("majorly", BOOSTER_INCREMENT),
    ("more", BOOSTER_INCREMENT), ("most", BOOSTER_INCREMENT),
    ("particularly", BOOSTER_INCREMENT), ("purely", BOOSTER_INCREMENT),
    ("quite", BOOSTER_INCREMENT), ("really", BOOSTER_INCREMENT),
    ("remarkably", BOOSTER_INCREMENT), ("so", BOOSTER_INCREMENT),
    ("substantially", BOOSTER_INCREMENT), ("thoroughly", BOOSTER_INCREMENT),
    ("totally", BOOSTER_INCREMENT), ("tremendously", BOOSTER_INCREMENT),
    ("truly", BOOSTER_INCREMENT), ("unbelievably", BOOSTER_INCREMENT),
    ("unusually", BOOSTER_INCREMENT), ("utterly", BOOSTER_INCREMENT),
    ("very", BOOSTER_INCREMENT),
    ("almost", BOOSTER_DECREMENT), ("barely", BOOSTER_DECREMENT),
    ("hardly", BOOSTER_DECREMENT), ("kinda", BOOSTER_DECREMENT),
    ("less", BOOSTER_DECREMENT), ("little", BOOSTER_DECREMENT),
    ("marginally", BOOSTER_DECREMENT), ("occasionally", BOOSTER_DECREMENT),
    ("partly", BOOSTER_DECREMENT), ("scarcely", BOOSTER_DECREMENT),
    ("slightly", BOOSTER_DECREMENT), ("somewhat", BOOSTER_DECREMENT),
    ("sorta", BOOSTER_DECREMENT),
];

/// Words that negate the sentiment of the words after them.
const NEGATIONS: &[&str] = &[
    "aint", "arent", "cannot", "cant", "couldnt", "darent", "didnt", "doesnt", "ain't",
    "aren't", "can't", "couldn't", "daren't", "didn't", "doesn't", "dont", "hadnt", "hasnt",
    "havent", "isnt", "mightnt", "mustnt", "neither", "don't", "hadn't", "hasn't", "haven't",
    "isn't", "mightn't", "mustn't", "neednt", "needn't", "never", "none", "nope", "nor",
    "not", "nothing", "nowhere", "oughtnt", "shant", "shouldnt", "uhuh", "wasnt", "werent",
    "oughtn't", "shan't", "shouldn't", "uh-uh", "wasn't", "weren't", "without", "wont",
    "wouldnt", "won't", "wouldn't", "rarely", "seldom", "despite",
];

/// Emoji replaced by their descriptive names before scoring.
const EMOJI: &[(char, &str)] = &[
    ('😀', "grinning face"), ('😃', "grinning face with big eyes"),
    ('😄', "grinning face with smiling eyes"), ('😁', "beaming face with smiling eyes"),
    ('😆', "grinning squinting face"), ('😅', "grinning face with sweat"),
    ('🤣', "rolling on the floor laughing"), ('😂', "face with tears of joy"),
    ('🙂', "slightly smiling face"), ('😊', "smiling face with smiling eyes"),
    ('😍', "smiling face with heart eyes"), ('😘', "face blowing a kiss"),
    ('😉', "winking face"), ('😎', "smiling face with sunglasses"),
    ('🤗', "hugging face"), ('🤔', "thinking face"), ('😐', "neutral face"),
    ('😳', "flushed face"), ('😢', "crying face"), ('😭', "loudly crying face"),
    ('😡', "enraged face"), ('😠', "angry face"), ('🤬', "face with symbols on mouth"),
    ('😤', "face with steam from nose"), ('😱', "face screaming in fear"),
    ('😨', "fearful face"), ('😰', "anxious face with sweat"), ('😟', "worried face"),
    ('😞', "disappointed face"), ('😔', "pensive face"), ('😩', "weary face"),
    ('😫', "tired face"), ('🙁', "slightly frowning face"), ('☹', "frowning face"),
    ('👍', "thumbs up"), ('👎', "thumbs down"), ('👏', "clapping hands"),
    ('🙏', "folded hands"), ('❤', "red heart"), ('💔', "broken heart"),
    ('🎉', "party popper"), ('💯', "hundred points"), ('✅', "check mark button"),
    ('❌', "cross mark"), ('⚠', "warning"),
];

pub static LEXICON: LazyLock<HashMap<&'static str, f64>> =
    LazyLock::new(|| VALENCES.iter().copied().collect());

pub static BOOSTER_WORDS: LazyLock<HashMap<&'static str, f64>> =
    LazyLock::new(|| BOOSTERS.iter().copied().collect());

pub static EMOJI_NAMES: LazyLock<HashMap<char, &'static str>> =
    LazyLock::new(|| EMOJI.iter().copied().collect());

/// Check whether a lower-cased word negates what follows it.
pub fn is_negation(word: &str) -> bool {
    NEGATIONS.contains(&word) || word.contains("n't")
}
