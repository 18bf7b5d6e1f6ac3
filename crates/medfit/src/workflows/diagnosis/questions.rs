use super::domain::QUESTION_COUNT;

const QUESTIONS: [&str; QUESTION_COUNT as usize] = [
    "今の職場でこれ以上の成長は難しいと感じますか？",
    "今の働き方を10年後も続けている自分が想像しにくいですか？",
    "給与や待遇の伸びに限界を感じていますか？",
    "業務量や夜勤などの負担が今後も続くことに不安がありますか？",
    "自分の専門性が今の職場では十分に活かされていないと感じますか？",
    "将来のことを考えるのを後回しにしがちですか？",
    "休日は疲れて何もできないことが多いですか？",
    "新しい情報や学びに触れる機会がほとんどありませんか？",
    "「自分にはこの仕事しかない」と思うことがありますか？",
    "周りに流されて働き方を決めていると感じますか？",
    "本業を続けながら別の収入源を持ちたいと思いますか？",
    "医療の知識を活かした副業に興味がありますか？",
    "空き時間を使って小さく何かを始めてみたいですか？",
    "オンラインで完結する仕事に関心がありますか？",
    "本業以外のスキルを身につけたいと思いますか？",
    "医療現場以外の企業で働くことに興味がありますか？",
    "半年以内に職場を変えることを考えたことがありますか？",
    "医療×IT・企業勤務などの新しいキャリアに関心がありますか？",
    "転職サイトや求人情報を見ることがありますか？",
    "年収や働き方を大きく変えたいと思いますか？",
];

/// Question text for a 1-based question number.
pub fn question(number: u8) -> Option<&'static str> {
    usize::from(number)
        .checked_sub(1)
        .and_then(|index| QUESTIONS.get(index))
        .copied()
}

/// Chat prompt for a question, e.g. `質問1：...（はい / いいえ）`.
pub fn prompt(number: u8) -> Option<String> {
    question(number).map(|text| format!("質問{number}：{text}（はい / いいえ）"))
}
