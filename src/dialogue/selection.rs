//! Picking which conversation an NPC opens with

use super::conversation::Conversation;
use rand::seq::SliceRandom;
use rand::Rng;

/// Choose among an NPC's conversation possibilities
///
/// A single possibility always wins. With several, a random one whose
/// trigger emotion matches the dominant emotion is picked, or a random one
/// from all of them when none match. `None` only when there are no
/// possibilities.
pub fn select_conversation<'a, R: Rng + ?Sized>(
    possibilities: &[&'a Conversation],
    dominant_emotion: Option<&str>,
    rng: &mut R,
) -> Option<&'a Conversation> {
    if let [only] = possibilities {
        return Some(*only);
    }
    let matching: Vec<&'a Conversation> = possibilities
        .iter()
        .copied()
        .filter(|c| c.trigger_emotion.is_some() && c.trigger_emotion.as_deref() == dominant_emotion)
        .collect();
    let pool = if matching.is_empty() { possibilities } else { &matching[..] };
    pool.choose(rng).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn conversation(id: &str, trigger: Option<&str>) -> Conversation {
        let mut c = Conversation::new(id, Vec::new());
        c.trigger_emotion = trigger.map(str::to_string);
        c
    }

    #[test]
    fn test_single_possibility_ignores_emotion() {
        let only = conversation("only", Some("Anger"));
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let picked = select_conversation(&[&only], Some("Happiness"), &mut rng).unwrap();
        assert_eq!(picked.id, "only");
    }

    #[test]
    fn test_dominant_emotion_match_preferred() {
        let happy = conversation("happy", Some("Happiness"));
        let angry = conversation("angry", Some("Anger"));
        let plain = conversation("plain", None);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        for _ in 0..20 {
            let picked = select_conversation(&[&happy, &angry, &plain], Some("Anger"), &mut rng).unwrap();
            assert_eq!(picked.id, "angry");
        }
    }

    #[test]
    fn test_falls_back_to_any_when_nothing_matches() {
        let happy = conversation("happy", Some("Happiness"));
        let angry = conversation("angry", Some("Anger"));
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let picked = select_conversation(&[&happy, &angry], Some("Fear"), &mut rng).unwrap();
        assert!(picked.id == "happy" || picked.id == "angry");
        assert!(select_conversation(&[], None, &mut rng).is_none());
    }
}
