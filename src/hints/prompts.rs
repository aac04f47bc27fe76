use crate::game::ClueEntry;

pub const HINT_SYSTEM: &str = "You are an expert cryptic crossword setter and teacher. Provide precise, non-spoiler guidance. \
Given a clue and its true answer (for validation only), craft exactly three concise hints without revealing the answer. \
Each hint should focus on ONE most helpful aspect. Use one of these labels at the start of each hint: \
'Indicator:', 'Fodder:', 'Definition:', 'Device:', 'Structure:', 'Surface:', 'Grammar:', 'Link:', 'Position:'. \
- Indicator: name the exact word(s) signalling the device (e.g., broken, wild, inside, back, heard). \
- Fodder: name the exact letters/word(s) to be manipulated or used (or say 'N/A' if not applicable). \
- Definition: name the exact definition word(s). If &lit, say 'Definition: entire clue (&lit)'. \
- Device: state the clue type (anagram, container, hidden, reversal, homophone, deletion, insertion, initials/ends, charade, double definition, &lit). \
- Structure/Position/Link/Grammar/Surface: highlight helpful structure (e.g., joiners like 'with', link words, enumeration, up/down reversal cues, punctuation tricks). \
Always quote or clearly identify the exact clue token(s) for the chosen aspect. Do not repeat the same aspect unless strongly justified by the clue. \
Keep each hint under 160 characters. Never output or spell the answer. Output strictly a JSON array of three strings, nothing else.";

pub const EXPLANATION_SYSTEM: &str = "You are an expert cryptic crossword setter and teacher. Provide a clear, numbered explanation for one clue. \
Include: (1) the device name (anagram/container/hidden/reversal/homophone/deletion/insertion/initials/charade/double definition/&lit), \
(2) 3-6 numbered steps that cite the exact clue word(s) for each role, and (3) a highlight map. \
In steps, explicitly state: indicator token(s), fodder token(s) (if any), definition token(s), and any substitutions or abbreviations (e.g., 'way' => 'ST'). \
Each step must begin with '1.', '2.', etc. Use only clue tokens when naming parts, with brief parenthetical rationale (e.g., 'Indicator: 'broken' (anagram cue)'). \
Output strictly a JSON object with keys: 'device' (string), 'steps' (array of strings), and 'highlights' (array of {role:'indicator|fodder|definition', text:'exact tokens from clue'}). \
Never reveal or spell the answer.";

pub const HINT_RETRY: &str =
    "\nIMPORTANT: Output ONLY a JSON array of exactly three string hints. Do not include any other text.";

pub const EXPLANATION_RETRY: &str = "\nIMPORTANT: Do NOT reveal or spell the answer in any step or highlight. \
Use only clue tokens; keep steps generic. Return ONLY JSON object.";

fn preamble(clue: &ClueEntry) -> String {
    let mut out = format!("Clue: {}", clue.clue.trim());
    if !clue.direction.is_empty() {
        out.push_str(&format!("\nDirection: {}", clue.direction));
    }
    out.push_str(&format!("\nAnswer length: {}", clue.length));
    out
}

pub fn hint_prompt(clue: &ClueEntry) -> String {
    format!(
        "{}\nYou know the answer is '{}' but you must not reveal, spell, or anagram this string in any hint.\n\
         Produce three hints. Each hint must start with exactly one label from: \
         Indicator, Fodder, Definition, Device, Structure, Surface, Grammar, Link, Position.\n\
         Name the exact clue tokens for the chosen aspect. If fodder not applicable, choose a different aspect. \
         Do not repeat aspects unless helpful.\n\
         Return only a JSON array of exactly three strings.",
        preamble(clue),
        clue.answer.trim(),
    )
}

pub fn explanation_prompt(clue: &ClueEntry) -> String {
    format!(
        "{}\nYou know the answer is '{}' but you must not reveal, spell, or anagram this string in any explanation.\n\
         Return only JSON with: device; steps as 3-6 numbered strings citing exact tokens plus roles \
         (indicator/fodder/definition) and any substitutions; highlights array marking tokens by role.",
        preamble(clue),
        clue.answer.trim(),
    )
}
