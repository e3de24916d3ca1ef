//! Fixed page wrapper around the entry fragments: styles, the search box,
//! the problems/all filter and the localStorage-backed "checked" state.

pub(crate) const HEAD: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="UTF-8">
<title>BibTeX Check</title>
<style>
body {
    font-family: Calibri, Arial, Sans;
    padding: 10px;
    width: 1030px;
    margin: 10px auto;
    border-top: 1px solid black;
}
#title { width: 720px; border-bottom: 1px solid black; }
#title h1 { margin: 10px 0px; }
#control { clear: both; }
#search { float: left; }
#search input { width: 300px; font-size: 14pt; }
#mode { text-align: right; }
#mode label:first-child { font-weight: bold; }
#mode input { margin-left: 20px; }
.info {
    margin-top: 10px;
    padding: 10px;
    background: #FAFADD;
    width: 250px;
    float: right;
    box-shadow: 1px 1px 1px 1px #ccc;
    clear: both;
}
.info h2 { font-size: 12pt; padding: 0px; margin: 0px; }
.bibTag {
    margin-top: 10px;
    margin-bottom: 10px;
    padding: 10px;
    background: #FFBBAA;
    counter-increment: bibTag;
    width: 700px;
    border: 1px solid #993333;
    border-left: 5px solid #993333;
    box-shadow: 1px 1px 1px 1px #ccc;
    float: left;
}
.active { box-shadow: 5px 5px 3px 3px #ccc; position: relative; top: -2px; }
.severe0 { background: #FAFAFA; border: 1px solid black; border-left: 5px solid black; }
.severe1 { background: #FFEEDD; }
.severe2 { background: #FFDDCC; }
.severe3 { background: #FFCCBB; }
.bibTag_checked { border: 1px solid #339933; border-left: 5px solid #339933; }
.bibTag h2:before { content: counter(bibTag) ". "; color: gray; }
.bibTag h2 {
    font-size: 11pt;
    font-weight: normal;
    font-family: monaco, monospace;
    padding: 0px;
    margin: 0px;
}
.bibTag .links { float: right; position: relative; top: -22px; }
.bibTag .links a { color: #3333CC; }
.bibTag .links a:visited { color: #666666; }
.bibTag .reference { clear: both; margin-left: 20px; font-size: 11pt; font-weight: normal; }
.bibTag ul { clear: both; }
.enumprob { font-weight: lighter; font-size: 10pt; }
.bibTag .bibTag_control { float: right; margin: 0px; padding: 0px; }
.bibTag .bibtex_toggle { text-decoration: underline; font-size: 9pt; cursor: pointer; padding-top: 5px; }
.bibTag .bibtex {
    margin-top: 5px;
    font-family: Monospace;
    font-size: 8pt;
    display: none;
    border: 1px solid black;
    background-color: #FFFFFF;
    padding: 5px;
}
</style>
<script src="https://ajax.googleapis.com/ajax/libs/jquery/1.5/jquery.min.js"></script>
<script>
function isInProblemMode() {
    return $('#mode_problems:checked').val() == 'problems';
}

function update() {
    $('.bibTag').hide();
    $('.bibTag[id*=' + $('#search input').val() + ']').show();
    $('.bibTag .checked').each(function () {
        if ($(this).attr('checked')) {
            $(this).parents('.bibTag').addClass('bibTag_checked');
        } else {
            $(this).parents('.bibTag').removeClass('bibTag_checked');
        }
    });
    if (isInProblemMode()) {
        $('.severe0').hide();
        $('.bibTag_checked').hide();
    }
}

$(document).ready(function () {
    $('.bibtex_toggle').click(function (event) {
        event.preventDefault();
        $(this).next().slideToggle();
    });
    $('#search input').live('input', function () { update(); });
    $('#mode input').change(function () { update(); });
    $('#uncheck_button').click(function () {
        $('.bibTag .checked').attr('checked', false);
        localStorage.clear();
        update();
    });
    $('.bibTag a').mousedown(function () {
        $('.bibTag').removeClass('active');
        $(this).parents('.bibTag').addClass('active');
    });
    $('.bibTag .checked').change(function () {
        var bibTag = $(this).parents('.bibTag');
        bibTag.toggleClass('bibTag_checked');
        var checked = bibTag.hasClass('bibTag_checked');
        localStorage.setItem(bibTag.attr('id'), checked);
        if (checked && isInProblemMode()) {
            bibTag.slideUp();
        }
    });
    $('.bibTag .checked').each(function () {
        $(this).attr('checked', localStorage.getItem($(this).parents('.bibTag').attr('id')) == 'true');
    });
    update();
});
</script>
</head>
<body>
<div id="title">
<h1>BibTeX Check</h1>
<div id="control">
<form id="search"><input placeholder="search entry ID ..."/></form>
<form id="mode">
<label>show entries:</label>
<input type="radio" name="mode" id="mode_problems" value="problems" checked="checked" />
<label for="mode_problems">problems</label>
<input type="radio" name="mode" id="mode_all" value="all" />
<label for="mode_all">all</label>
<input type="button" value="uncheck all" id="uncheck_button" />
</form>
</div>
</div>
"#;

pub(crate) const TAIL: &str = "\n</body>\n</html>\n";
