//! Codebook mapping each supported kana to its candidate cover words.
//!
//! Every display word and every spoken reading appears exactly once across the
//! whole table, so a listener holding the key can map each heard word back to
//! its kana. Rows are listed in gojūon order; row order is also the order of the
//! supported alphabet.

/// One cover word. `reading` is what a decoder must hear; `homograph` marks
/// display forms whose default pronunciation differs from `reading`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordEntry {
    pub word: &'static str,
    pub reading: &'static str,
    pub homograph: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct CodebookRow {
    pub character: char,
    pub candidates: &'static [WordEntry],
}

const fn kana(word: &'static str) -> WordEntry {
    WordEntry {
        word,
        reading: word,
        homograph: false,
    }
}

const fn plain(word: &'static str, reading: &'static str) -> WordEntry {
    WordEntry {
        word,
        reading,
        homograph: false,
    }
}

const fn homograph(word: &'static str, reading: &'static str) -> WordEntry {
    WordEntry {
        word,
        reading,
        homograph: true,
    }
}

pub static CODEBOOK: &[CodebookRow] = &[
    CodebookRow {
        character: 'あ',
        candidates: &[kana("りんご"), plain("電車", "でんしゃ"), homograph("市場", "いちば")],
    },
    CodebookRow {
        character: 'い',
        candidates: &[kana("みかん"), plain("自転車", "じてんしゃ"), homograph("今日", "こんにち")],
    },
    CodebookRow {
        character: 'う',
        candidates: &[kana("ぶどう"), plain("飛行機", "ひこうき"), homograph("明日", "あす")],
    },
    CodebookRow {
        character: 'え',
        candidates: &[kana("もも"), plain("図書館", "としょかん"), homograph("上手", "うわて")],
    },
    CodebookRow {
        character: 'お',
        candidates: &[kana("いちご"), plain("公園", "こうえん"), homograph("人気", "ひとけ")],
    },
    CodebookRow {
        character: 'か',
        candidates: &[kana("すいか"), plain("郵便局", "ゆうびんきょく"), homograph("紅葉", "こうよう")],
    },
    CodebookRow {
        character: 'き',
        candidates: &[kana("れもん"), plain("美術館", "びじゅつかん"), homograph("風車", "ふうしゃ")],
    },
    CodebookRow {
        character: 'く',
        candidates: &[kana("めろん"), plain("病院", "びょういん"), homograph("色紙", "しきし")],
    },
    CodebookRow {
        character: 'け',
        candidates: &[kana("ばなな"), plain("動物園", "どうぶつえん"), homograph("大家", "たいか")],
    },
    CodebookRow {
        character: 'こ',
        candidates: &[kana("なし"), plain("水族館", "すいぞくかん"), homograph("一日", "ついたち")],
    },
    CodebookRow {
        character: 'さ',
        candidates: &[kana("かき"), plain("映画館", "えいがかん"), homograph("下手", "したて")],
    },
    CodebookRow {
        character: 'し',
        candidates: &[kana("くり"), plain("交番", "こうばん"), homograph("寒気", "かんき")],
    },
    CodebookRow {
        character: 'す',
        candidates: &[kana("ねこ"), plain("新聞", "しんぶん"), homograph("最中", "さなか")],
    },
    CodebookRow {
        character: 'せ',
        candidates: &[kana("いぬ"), plain("鉛筆", "えんぴつ"), homograph("目下", "めした")],
    },
    CodebookRow {
        character: 'そ',
        candidates: &[kana("うさぎ"), plain("消しゴム", "けしごむ"), homograph("仮名", "かめい")],
    },
    CodebookRow {
        character: 'た',
        candidates: &[kana("きつね"), plain("ノート", "のーと"), homograph("工夫", "こうふ")],
    },
    CodebookRow {
        character: 'ち',
        candidates: &[kana("たぬき"), kana("はさみ"), homograph("見物", "みもの")],
    },
    CodebookRow {
        character: 'つ',
        candidates: &[kana("りす"), plain("定規", "じょうぎ"), homograph("金星", "きんぼし")],
    },
    CodebookRow {
        character: 'て',
        candidates: &[kana("くま"), plain("時計", "とけい"), homograph("分別", "ぶんべつ")],
    },
    CodebookRow {
        character: 'と',
        candidates: &[kana("ぞう"), plain("眼鏡", "めがね"), homograph("利益", "りやく")],
    },
    CodebookRow {
        character: 'な',
        candidates: &[kana("きりん"), plain("傘", "かさ"), homograph("十分", "じっぷん")],
    },
    CodebookRow {
        character: 'に',
        candidates: &[kana("らいおん"), plain("帽子", "ぼうし"), homograph("素面", "すめん")],
    },
    CodebookRow {
        character: 'ぬ',
        candidates: &[kana("ぱんだ"), plain("手袋", "てぶくろ"), homograph("日向", "ひゅうが")],
    },
    CodebookRow {
        character: 'ね',
        candidates: &[kana("さる"), plain("靴下", "くつした"), homograph("故郷", "こきょう")],
    },
    CodebookRow {
        character: 'の',
        candidates: &[kana("しか"), plain("財布", "さいふ"), homograph("初日", "はつひ")],
    },
    CodebookRow {
        character: 'は',
        candidates: &[kana("かめ"), plain("鞄", "かばん"), homograph("足跡", "そくせき")],
    },
    CodebookRow {
        character: 'ひ',
        candidates: &[kana("かえる"), plain("机", "つくえ"), homograph("生物", "なまもの")],
    },
    CodebookRow {
        character: 'ふ',
        candidates: &[kana("めだか"), plain("椅子", "いす"), homograph("一行", "いちぎょう")],
    },
    CodebookRow {
        character: 'へ',
        candidates: &[kana("すずめ"), plain("本棚", "ほんだな"), homograph("背筋", "はいきん")],
    },
    CodebookRow {
        character: 'ほ',
        candidates: &[kana("つばめ"), plain("布団", "ふとん"), homograph("生花", "せいか")],
    },
    CodebookRow {
        character: 'ま',
        candidates: &[kana("からす"), plain("枕", "まくら"), plain("小雨", "こさめ")],
    },
    CodebookRow {
        character: 'み',
        candidates: &[kana("かもめ"), plain("毛布", "もうふ"), plain("細雪", "ささめゆき")],
    },
    CodebookRow {
        character: 'む',
        candidates: &[kana("はと"), plain("お茶", "おちゃ"), plain("夕立", "ゆうだち")],
    },
    CodebookRow {
        character: 'め',
        candidates: &[kana("あひる"), plain("紅茶", "こうちゃ"), plain("木枯らし", "こがらし")],
    },
    CodebookRow {
        character: 'も',
        candidates: &[kana("ひつじ"), plain("牛乳", "ぎゅうにゅう"), plain("春雨", "はるさめ")],
    },
    CodebookRow {
        character: 'や',
        candidates: &[kana("やぎ"), plain("珈琲", "こーひー"), plain("虹", "にじ")],
    },
    CodebookRow {
        character: 'ゆ',
        candidates: &[kana("うし"), plain("ジュース", "じゅーす"), plain("雷", "かみなり")],
    },
    CodebookRow {
        character: 'よ',
        candidates: &[kana("うま"), plain("お酒", "おさけ"), plain("吹雪", "ふぶき")],
    },
    CodebookRow {
        character: 'ら',
        candidates: &[kana("ぶた"), plain("パン", "ぱん"), plain("霧", "きり")],
    },
    CodebookRow {
        character: 'り',
        candidates: &[kana("にわとり"), plain("ご飯", "ごはん"), plain("霜", "しも")],
    },
    CodebookRow {
        character: 'る',
        candidates: &[kana("いるか"), plain("お米", "おこめ"), plain("夕焼け", "ゆうやけ")],
    },
    CodebookRow {
        character: 'れ',
        candidates: &[kana("くじら"), plain("味噌汁", "みそしる"), plain("朝焼け", "あさやけ")],
    },
    CodebookRow {
        character: 'ろ',
        candidates: &[kana("さめ"), kana("たまご"), plain("月見", "つきみ")],
    },
    CodebookRow {
        character: 'わ',
        candidates: &[kana("たこ"), plain("豆腐", "とうふ"), plain("花見", "はなみ")],
    },
    CodebookRow {
        character: 'を',
        candidates: &[kana("いか"), plain("納豆", "なっとう")],
    },
    CodebookRow {
        character: 'ん',
        candidates: &[kana("かに"), kana("うどん")],
    },
    CodebookRow {
        character: 'が',
        candidates: &[kana("えび"), kana("そば")],
    },
    CodebookRow {
        character: 'ぎ',
        candidates: &[kana("あさり"), plain("ラーメン", "らーめん")],
    },
    CodebookRow {
        character: 'ぐ',
        candidates: &[kana("さんま"), plain("カレー", "かれー")],
    },
    CodebookRow {
        character: 'げ',
        candidates: &[kana("まぐろ"), plain("お寿司", "おすし")],
    },
    CodebookRow {
        character: 'ご',
        candidates: &[kana("いわし"), plain("天ぷら", "てんぷら")],
    },
    CodebookRow {
        character: 'ざ',
        candidates: &[kana("ひまわり"), plain("餃子", "ぎょうざ")],
    },
    CodebookRow {
        character: 'じ',
        candidates: &[kana("たんぽぽ"), plain("焼き鳥", "やきとり")],
    },
    CodebookRow {
        character: 'ず',
        candidates: &[kana("あさがお"), plain("お団子", "おだんご")],
    },
    CodebookRow {
        character: 'ぜ',
        candidates: &[kana("すみれ"), kana("せんべい")],
    },
    CodebookRow {
        character: 'ぞ',
        candidates: &[kana("ゆり"), plain("羊羹", "ようかん")],
    },
    CodebookRow {
        character: 'だ',
        candidates: &[kana("つつじ"), plain("赤", "あか")],
    },
    CodebookRow {
        character: 'ぢ',
        candidates: &[kana("さくら"), plain("青", "あお")],
    },
    CodebookRow {
        character: 'づ',
        candidates: &[kana("うめ"), plain("黄色", "きいろ")],
    },
    CodebookRow {
        character: 'で',
        candidates: &[kana("ばら"), plain("緑", "みどり")],
    },
    CodebookRow {
        character: 'ど',
        candidates: &[kana("きく"), plain("紫", "むらさき")],
    },
    CodebookRow {
        character: 'ば',
        candidates: &[kana("ききょう"), plain("白", "しろ")],
    },
    CodebookRow {
        character: 'び',
        candidates: &[kana("あやめ"), plain("黒", "くろ")],
    },
    CodebookRow {
        character: 'ぶ',
        candidates: &[kana("つばき"), plain("茶色", "ちゃいろ")],
    },
    CodebookRow {
        character: 'べ',
        candidates: &[kana("すぎ"), plain("灰色", "はいいろ")],
    },
    CodebookRow {
        character: 'ぼ',
        candidates: &[kana("まつ"), plain("金色", "きんいろ")],
    },
    CodebookRow {
        character: 'ぱ',
        candidates: &[kana("たけ"), plain("銀色", "ぎんいろ")],
    },
    CodebookRow {
        character: 'ぴ',
        candidates: &[kana("やなぎ"), plain("桃色", "ももいろ")],
    },
    CodebookRow {
        character: 'ぷ',
        candidates: &[kana("かえで"), plain("水色", "みずいろ")],
    },
    CodebookRow {
        character: 'ぺ',
        candidates: &[kana("いちょう"), plain("空色", "そらいろ")],
    },
    CodebookRow {
        character: 'ぽ',
        candidates: &[kana("けやき"), plain("橙", "だいだい")],
    },
    CodebookRow {
        character: 'ぁ',
        candidates: &[plain("月曜日", "げつようび"), plain("富士山", "ふじさん")],
    },
    CodebookRow {
        character: 'ぃ',
        candidates: &[plain("火曜日", "かようび"), plain("海", "うみ")],
    },
    CodebookRow {
        character: 'ぅ',
        candidates: &[plain("水曜日", "すいようび"), plain("川", "かわ")],
    },
    CodebookRow {
        character: 'ぇ',
        candidates: &[plain("木曜日", "もくようび"), plain("湖", "みずうみ")],
    },
    CodebookRow {
        character: 'ぉ',
        candidates: &[plain("金曜日", "きんようび"), plain("森", "もり")],
    },
    CodebookRow {
        character: 'っ',
        candidates: &[plain("土曜日", "どようび"), plain("島", "しま"), plain("山道", "やまみち")],
    },
    CodebookRow {
        character: 'ゃ',
        candidates: &[plain("日曜日", "にちようび"), plain("谷", "たに")],
    },
    CodebookRow {
        character: 'ゅ',
        candidates: &[plain("春", "はる"), plain("岬", "みさき")],
    },
    CodebookRow {
        character: 'ょ',
        candidates: &[plain("夏", "なつ"), plain("滝", "たき")],
    },
    CodebookRow {
        character: 'ゎ',
        candidates: &[plain("秋", "あき"), plain("峠", "とうげ")],
    },
    CodebookRow {
        character: 'ー',
        candidates: &[plain("冬", "ふゆ"), plain("砂浜", "すなはま")],
    },
];

/// Candidate words for `character`, or `None` outside the supported alphabet.
pub fn candidates_for(character: char) -> Option<&'static [WordEntry]> {
    CODEBOOK
        .iter()
        .find(|row| row.character == character)
        .map(|row| row.candidates)
}

/// Returns true when `character` has at least one cover word.
pub fn is_supported_character(character: char) -> bool {
    candidates_for(character).is_some()
}
